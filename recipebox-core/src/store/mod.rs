//! Persistence gateway for recipes and profiles.
//!
//! The service layer only talks to storage through [`RecipeStore`]. The server
//! provides a PostgreSQL implementation; [`MemoryStore`] backs tests and local runs.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::slug::SlugScope;
use crate::types::{Profile, ProfileId, Recipe, RecipeCard};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Slug '{slug}' is already taken")]
    SlugConflict { slug: String },

    #[error("Username '{username}' is already taken")]
    UsernameConflict { username: String },

    #[error("Recipe owner '{owner}' has no profile")]
    UnknownOwner { owner: String },
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn recipe_by_id(&self, id: Uuid) -> Result<Option<Recipe>, StoreError>;

    /// Case-insensitive on both the owner's username and the slug.
    /// With no username, only recipes without an owner match.
    async fn recipe_by_slug(
        &self,
        owner_username: Option<&str>,
        slug: &str,
    ) -> Result<Option<Recipe>, StoreError>;

    /// Cards for every owned recipe, or only those of one owner.
    async fn list_recipe_cards(
        &self,
        owner_username: Option<&str>,
    ) -> Result<Vec<RecipeCard>, StoreError>;

    /// Insert or replace by id. Fails with [`StoreError::SlugConflict`] when
    /// another recipe already holds the slug in `scope`, and with
    /// [`StoreError::UnknownOwner`] when the owner has no profile row.
    async fn upsert_recipe(&self, recipe: &Recipe, scope: &SlugScope)
        -> Result<Recipe, StoreError>;

    /// Delete the recipe only if it is still owned by `owner`.
    /// Returns whether a row was removed.
    async fn delete_recipe(&self, id: Uuid, owner: &ProfileId) -> Result<bool, StoreError>;

    async fn slug_exists(&self, scope: &SlugScope, slug: &str) -> Result<bool, StoreError>;

    /// Slugs in `scope` equal to `candidate` or starting with `candidate-`.
    async fn slugs_with_prefix(
        &self,
        scope: &SlugScope,
        candidate: &str,
    ) -> Result<Vec<String>, StoreError>;

    async fn profile(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError>;

    /// Case-insensitive lookup.
    async fn profile_by_username(&self, username: &str) -> Result<Option<Profile>, StoreError>;

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, StoreError>;

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.profile_by_username(username).await?.is_some())
    }
}
