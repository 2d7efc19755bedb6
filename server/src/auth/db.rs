use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use recipebox_core::identity::{IdentityError, IdentityProvider};
use recipebox_core::ProfileId;
use std::sync::Arc;

use crate::db::DbPool;
use crate::schema::session;

use super::crypto::hash_token;

/// Resolves bearer tokens against the `session` table.
pub struct SessionIdentityProvider {
    pool: Arc<DbPool>,
}

impl SessionIdentityProvider {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Option<ProfileId>, IdentityError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| IdentityError::Lookup(e.to_string()))?;
        let token_hash = hash_token(token);

        let profile_id: Option<String> = session::table
            .filter(session::token_hash.eq(&token_hash))
            .filter(session::expires_at.gt(Utc::now()))
            .select(session::profile_id)
            .first(&mut conn)
            .optional()
            .map_err(|e| IdentityError::Lookup(e.to_string()))?;

        Ok(profile_id.map(ProfileId))
    }
}
