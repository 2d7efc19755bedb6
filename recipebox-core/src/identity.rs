//! Caller identity, passed explicitly into every operation that needs it.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::types::ProfileId;

/// Who is making the current request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CallerIdentity {
    #[default]
    Anonymous,
    Authenticated(ProfileId),
}

impl CallerIdentity {
    pub fn profile_id(&self) -> Option<&ProfileId> {
        match self {
            CallerIdentity::Anonymous => None,
            CallerIdentity::Authenticated(id) => Some(id),
        }
    }

    /// True if the caller is authenticated as `owner`.
    pub fn is(&self, owner: &ProfileId) -> bool {
        self.profile_id() == Some(owner)
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity lookup failed: {0}")]
    Lookup(String),
}

/// Resolves a bearer token to the profile it was issued for.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns `None` for unknown or expired tokens.
    async fn resolve(&self, token: &str) -> Result<Option<ProfileId>, IdentityError>;
}

/// Fixed token table, for tests and local development.
#[derive(Debug, Default)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, ProfileId>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str, profile_id: &str) -> Self {
        self.tokens
            .insert(token.to_string(), ProfileId::new(profile_id));
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Option<ProfileId>, IdentityError> {
        Ok(self.tokens.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_resolves_known_tokens_only() {
        let provider = StaticIdentityProvider::new().with_token("secret", "alice");

        assert_eq!(
            provider.resolve("secret").await.unwrap(),
            Some(ProfileId::new("alice"))
        );
        assert_eq!(provider.resolve("other").await.unwrap(), None);
    }

    #[test]
    fn test_anonymous_caller_owns_nothing() {
        let owner = ProfileId::new("alice");
        assert!(!CallerIdentity::Anonymous.is(&owner));
        assert!(CallerIdentity::Authenticated(owner.clone()).is(&owner));
    }
}
