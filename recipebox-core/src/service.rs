//! Recipe and profile operations, composed from the extractor, the slug
//! generator and the persistence gateway.
//!
//! Every operation that needs authorization takes the [`CallerIdentity`]
//! explicitly. No operation retries the model call; the only retry is
//! recomputing a generated slug after losing an insert race.

use std::sync::Arc;
use uuid::Uuid;

use crate::ai::RecipeExtractor;
use crate::error::{extraction_error, storage_error, ServiceError};
use crate::identity::CallerIdentity;
use crate::slug::{generate_unique_slug, is_normalized, SlugScope, SlugScopeMode, MAX_SLUG_ATTEMPTS};
use crate::store::{RecipeStore, StoreError};
use crate::types::{
    FileUpload, GeneratedRecipe, Profile, ProfileId, Recipe, RecipeCard, RecipeDraft,
};

pub const MAX_USERNAME_LEN: usize = 32;

pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
    extractor: RecipeExtractor,
    slug_scope: SlugScopeMode,
}

fn require(caller: &CallerIdentity) -> Result<&ProfileId, ServiceError> {
    caller.profile_id().ok_or(ServiceError::NotAuthorized)
}

/// Usernames appear in URLs: 1-32 ASCII letters, digits or underscores.
pub fn validate_username(username: &str) -> Result<(), ServiceError> {
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return Err(ServiceError::Validation(format!(
            "Username must be between 1 and {} characters",
            MAX_USERNAME_LEN
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ServiceError::Validation(
            "Username may only contain letters, digits and underscores".to_string(),
        ));
    }
    Ok(())
}

impl RecipeService {
    pub fn new(
        store: Arc<dyn RecipeStore>,
        extractor: RecipeExtractor,
        slug_scope: SlugScopeMode,
    ) -> Self {
        Self {
            store,
            extractor,
            slug_scope,
        }
    }

    fn scope_for(&self, owner: &ProfileId) -> SlugScope {
        self.slug_scope.scope_for(Some(owner))
    }

    /// The caller's profile; one with an empty username if none was saved yet.
    pub async fn get_my_profile(&self, caller: &CallerIdentity) -> Result<Profile, ServiceError> {
        let id = require(caller)?;

        let profile = self
            .store
            .profile(id)
            .await
            .map_err(storage_error("load profile"))?;

        Ok(profile.unwrap_or_else(|| Profile {
            id: id.clone(),
            username: String::new(),
        }))
    }

    pub async fn save_profile(
        &self,
        caller: &CallerIdentity,
        profile: Profile,
    ) -> Result<Profile, ServiceError> {
        if !caller.is(&profile.id) {
            return Err(ServiceError::NotAuthorized);
        }
        validate_username(&profile.username)?;

        let holder = self
            .store
            .profile_by_username(&profile.username)
            .await
            .map_err(storage_error("check username"))?;
        if matches!(holder, Some(ref other) if other.id != profile.id) {
            return Err(ServiceError::Conflict(format!(
                "Username '{}' is already taken",
                profile.username
            )));
        }

        self.store
            .upsert_profile(&profile)
            .await
            .map_err(storage_error("save profile"))
    }

    pub async fn username_available(&self, username: &str) -> Result<bool, ServiceError> {
        let exists = self
            .store
            .username_exists(username)
            .await
            .map_err(storage_error("check username"))?;
        Ok(!exists)
    }

    /// Whether `slug` is free in the caller's scope.
    pub async fn slug_available(
        &self,
        caller: &CallerIdentity,
        slug: &str,
    ) -> Result<bool, ServiceError> {
        let owner = require(caller)?;
        let exists = self
            .store
            .slug_exists(&self.scope_for(owner), slug)
            .await
            .map_err(storage_error("check slug"))?;
        Ok(!exists)
    }

    pub async fn list_recipe_cards(
        &self,
        owner_username: Option<&str>,
    ) -> Result<Vec<RecipeCard>, ServiceError> {
        self.store
            .list_recipe_cards(owner_username)
            .await
            .map_err(storage_error("list recipes"))
    }

    pub async fn get_recipe(
        &self,
        owner_username: Option<&str>,
        slug: &str,
    ) -> Result<Recipe, ServiceError> {
        self.store
            .recipe_by_slug(owner_username, slug)
            .await
            .map_err(storage_error("load recipe"))?
            .ok_or(ServiceError::NotFound("Recipe"))
    }

    /// Create or replace a client-supplied recipe.
    ///
    /// The caller must be the recipe's owner, must have a username, and, when a
    /// recipe with the same id exists, must be its stored owner too. An empty slug keeps the stored one or,
    /// for a new recipe, is generated from the title.
    pub async fn save_recipe(
        &self,
        caller: &CallerIdentity,
        mut recipe: Recipe,
    ) -> Result<Recipe, ServiceError> {
        let owner = require(caller)?.clone();
        if recipe.owner_id.as_ref() != Some(&owner) {
            return Err(ServiceError::NotAuthorized);
        }
        if recipe.title.trim().is_empty() {
            return Err(ServiceError::Validation("Title cannot be empty".to_string()));
        }
        self.require_profile(&owner).await?;

        let existing = self
            .store
            .recipe_by_id(recipe.id)
            .await
            .map_err(storage_error("load recipe"))?;
        if let Some(existing) = &existing {
            if existing.owner_id.as_ref() != Some(&owner) {
                return Err(ServiceError::NotAuthorized);
            }
        }

        let scope = self.scope_for(&owner);

        if recipe.slug.is_empty() {
            match existing {
                Some(existing) => recipe.slug = existing.slug,
                None => return self.insert_with_unique_slug(recipe, &scope).await,
            }
        } else if !is_normalized(&recipe.slug) {
            return Err(ServiceError::Validation(format!(
                "Slug '{}' may only contain lowercase letters, digits and hyphens",
                recipe.slug
            )));
        }

        let saved = self
            .store
            .upsert_recipe(&recipe, &scope)
            .await
            .map_err(storage_error("save recipe"))?;

        tracing::info!(recipe_id = %saved.id, slug = %saved.slug, "Saved recipe");
        Ok(saved)
    }

    /// Delete a recipe owned by the caller.
    pub async fn delete_recipe(&self, caller: &CallerIdentity, id: Uuid) -> Result<(), ServiceError> {
        let owner = require(caller)?;

        let recipe = self
            .store
            .recipe_by_id(id)
            .await
            .map_err(storage_error("load recipe"))?
            .ok_or(ServiceError::NotFound("Recipe"))?;

        if recipe.owner_id.as_ref() != Some(owner) {
            return Err(ServiceError::NotAuthorized);
        }

        let deleted = self
            .store
            .delete_recipe(id, owner)
            .await
            .map_err(storage_error("delete recipe"))?;
        if !deleted {
            return Err(ServiceError::NotFound("Recipe"));
        }

        tracing::info!(recipe_id = %id, "Deleted recipe");
        Ok(())
    }

    pub async fn generate_from_images(
        &self,
        caller: &CallerIdentity,
        files: &[FileUpload],
    ) -> Result<GeneratedRecipe, ServiceError> {
        let owner = require(caller)?;
        let profile = self.require_profile(owner).await?;

        let draft = self
            .extractor
            .extract_from_images(files)
            .await
            .map_err(extraction_error("images"))?;

        self.persist_draft(draft, profile).await
    }

    pub async fn generate_from_text(
        &self,
        caller: &CallerIdentity,
        text: &str,
    ) -> Result<GeneratedRecipe, ServiceError> {
        let owner = require(caller)?;
        let profile = self.require_profile(owner).await?;

        let draft = self
            .extractor
            .extract_from_text(text)
            .await
            .map_err(extraction_error("text"))?;

        self.persist_draft(draft, profile).await
    }

    /// Copy any recipe into the caller's collection under a new id and slug.
    pub async fn copy_recipe(
        &self,
        caller: &CallerIdentity,
        id: Uuid,
    ) -> Result<GeneratedRecipe, ServiceError> {
        let owner = require(caller)?;
        let profile = self.require_profile(owner).await?;

        let source = self
            .store
            .recipe_by_id(id)
            .await
            .map_err(storage_error("load recipe"))?
            .ok_or(ServiceError::NotFound("Recipe"))?;

        let copy = Recipe {
            id: Uuid::new_v4(),
            owner_id: Some(profile.id.clone()),
            slug: String::new(),
            ..source
        };

        let saved = self
            .insert_with_unique_slug(copy, &self.scope_for(&profile.id))
            .await?;

        tracing::info!(source_id = %id, recipe_id = %saved.id, "Copied recipe");
        Ok(GeneratedRecipe {
            username: profile.username,
            slug: saved.slug,
        })
    }

    /// Recipes are addressed by their owner's username, so one must be set.
    async fn require_profile(&self, owner: &ProfileId) -> Result<Profile, ServiceError> {
        match self
            .store
            .profile(owner)
            .await
            .map_err(storage_error("load profile"))?
        {
            Some(profile) if !profile.username.is_empty() => Ok(profile),
            _ => Err(ServiceError::Validation(
                "Complete your profile before adding recipes".to_string(),
            )),
        }
    }

    async fn persist_draft(
        &self,
        draft: RecipeDraft,
        profile: Profile,
    ) -> Result<GeneratedRecipe, ServiceError> {
        let scope = self.scope_for(&profile.id);
        let recipe = draft.into_recipe(profile.id.clone(), String::new());

        let saved = self.insert_with_unique_slug(recipe, &scope).await?;

        tracing::info!(recipe_id = %saved.id, slug = %saved.slug, "Created recipe from extraction");
        Ok(GeneratedRecipe {
            username: profile.username,
            slug: saved.slug,
        })
    }

    /// Insert `recipe` under a slug generated from its title, regenerating
    /// when a concurrent writer claims the slug first.
    async fn insert_with_unique_slug(
        &self,
        mut recipe: Recipe,
        scope: &SlugScope,
    ) -> Result<Recipe, ServiceError> {
        let mut attempt = 1;
        loop {
            recipe.slug = generate_unique_slug(self.store.as_ref(), &recipe.title, scope)
                .await
                .map_err(storage_error("generate slug"))?;

            match self.store.upsert_recipe(&recipe, scope).await {
                Ok(saved) => return Ok(saved),
                Err(StoreError::SlugConflict { slug }) if attempt < MAX_SLUG_ATTEMPTS => {
                    tracing::warn!(slug = %slug, attempt, "Slug taken concurrently, regenerating");
                    attempt += 1;
                }
                Err(e) => return Err(storage_error("save recipe")(e)),
            }
        }
    }
}
