//! In-memory gateway with the same uniqueness and owner rules as the database
//! schema.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use super::{RecipeStore, StoreError};
use crate::slug::SlugScope;
use crate::types::{Profile, ProfileId, Recipe, RecipeCard};

#[derive(Debug, Default)]
struct Tables {
    /// Recipe plus the scope key its slug was registered under.
    recipes: HashMap<Uuid, (Recipe, String)>,
    profiles: HashMap<ProfileId, Profile>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recipe_count(&self) -> usize {
        self.tables
            .read()
            .map(|t| t.recipes.len())
            .unwrap_or_default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Connection("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Connection("memory store lock poisoned".to_string()))
    }
}

impl Tables {
    fn profile_by_username(&self, username: &str) -> Option<&Profile> {
        let wanted = username.to_lowercase();
        self.profiles
            .values()
            .find(|p| !p.username.is_empty() && p.username.to_lowercase() == wanted)
    }

    fn username_of(&self, owner: &Option<ProfileId>) -> Option<&str> {
        owner
            .as_ref()
            .and_then(|id| self.profiles.get(id))
            .map(|p| p.username.as_str())
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn recipe_by_id(&self, id: Uuid) -> Result<Option<Recipe>, StoreError> {
        Ok(self.read()?.recipes.get(&id).map(|(r, _)| r.clone()))
    }

    async fn recipe_by_slug(
        &self,
        owner_username: Option<&str>,
        slug: &str,
    ) -> Result<Option<Recipe>, StoreError> {
        let tables = self.read()?;
        let owner = match owner_username {
            Some(username) => match tables.profile_by_username(username) {
                Some(profile) => Some(profile.id.clone()),
                None => return Ok(None),
            },
            None => None,
        };
        let slug = slug.to_lowercase();

        Ok(tables
            .recipes
            .values()
            .map(|(r, _)| r)
            .find(|r| r.owner_id == owner && r.slug.to_lowercase() == slug)
            .cloned())
    }

    async fn list_recipe_cards(
        &self,
        owner_username: Option<&str>,
    ) -> Result<Vec<RecipeCard>, StoreError> {
        let tables = self.read()?;
        let wanted = owner_username.map(str::to_lowercase);

        let mut cards: Vec<RecipeCard> = tables
            .recipes
            .values()
            .filter_map(|(r, _)| {
                let username = tables.username_of(&r.owner_id)?;
                if let Some(wanted) = &wanted {
                    if username.to_lowercase() != *wanted {
                        return None;
                    }
                }
                Some(RecipeCard {
                    id: r.id,
                    username: username.to_string(),
                    slug: r.slug.clone(),
                    title: r.title.clone(),
                    tags: r.tags.clone(),
                })
            })
            .collect();

        cards.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(cards)
    }

    async fn upsert_recipe(
        &self,
        recipe: &Recipe,
        scope: &SlugScope,
    ) -> Result<Recipe, StoreError> {
        let mut tables = self.write()?;
        if let Some(owner) = &recipe.owner_id {
            if !tables.profiles.contains_key(owner) {
                return Err(StoreError::UnknownOwner {
                    owner: owner.to_string(),
                });
            }
        }
        let key = scope.key();
        let slug = recipe.slug.to_lowercase();

        let taken = tables.recipes.values().any(|(other, other_key)| {
            other.id != recipe.id && *other_key == key && other.slug.to_lowercase() == slug
        });
        if taken {
            return Err(StoreError::SlugConflict {
                slug: recipe.slug.clone(),
            });
        }

        tables
            .recipes
            .insert(recipe.id, (recipe.clone(), key.to_string()));
        Ok(recipe.clone())
    }

    async fn delete_recipe(&self, id: Uuid, owner: &ProfileId) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        let owned = matches!(
            tables.recipes.get(&id),
            Some((r, _)) if r.owner_id.as_ref() == Some(owner)
        );
        if owned {
            tables.recipes.remove(&id);
        }
        Ok(owned)
    }

    async fn slug_exists(&self, scope: &SlugScope, slug: &str) -> Result<bool, StoreError> {
        let tables = self.read()?;
        let key = scope.key();
        let slug = slug.to_lowercase();

        Ok(tables
            .recipes
            .values()
            .any(|(r, k)| *k == key && r.slug.to_lowercase() == slug))
    }

    async fn slugs_with_prefix(
        &self,
        scope: &SlugScope,
        candidate: &str,
    ) -> Result<Vec<String>, StoreError> {
        let tables = self.read()?;
        let key = scope.key();
        let prefix = format!("{}-", candidate);

        Ok(tables
            .recipes
            .values()
            .filter(|(r, k)| *k == key && (r.slug == candidate || r.slug.starts_with(&prefix)))
            .map(|(r, _)| r.slug.clone())
            .collect())
    }

    async fn profile(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        Ok(self.read()?.profiles.get(id).cloned())
    }

    async fn profile_by_username(&self, username: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self.read()?.profile_by_username(username).cloned())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, StoreError> {
        let mut tables = self.write()?;

        if let Some(existing) = tables.profile_by_username(&profile.username) {
            if existing.id != profile.id {
                return Err(StoreError::UsernameConflict {
                    username: profile.username.clone(),
                });
            }
        }

        tables.profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(owner: &str, slug: &str) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            owner_id: Some(ProfileId::new(owner)),
            slug: slug.to_string(),
            title: "Soup".to_string(),
            ingredients: String::new(),
            instructions: String::new(),
            notes: None,
            cook_temp_deg_f: None,
            cook_time_minutes: None,
            tags: vec![],
        }
    }

    async fn store_with_owners(owners: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        for owner in owners {
            store
                .upsert_profile(&Profile {
                    id: ProfileId::new(*owner),
                    username: owner.to_string(),
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_slug_conflict_is_scoped() {
        let store = store_with_owners(&["alice", "bob"]).await;
        let alice = SlugScope::Owner(ProfileId::new("alice"));
        let bob = SlugScope::Owner(ProfileId::new("bob"));

        store
            .upsert_recipe(&recipe("alice", "soup"), &alice)
            .await
            .unwrap();
        store
            .upsert_recipe(&recipe("bob", "soup"), &bob)
            .await
            .unwrap();

        let err = store
            .upsert_recipe(&recipe("alice", "SOUP"), &alice)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SlugConflict { .. }));
    }

    #[tokio::test]
    async fn test_upsert_same_id_keeps_slug() {
        let store = store_with_owners(&["alice"]).await;
        let scope = SlugScope::Global;
        let mut r = recipe("alice", "soup");

        store.upsert_recipe(&r, &scope).await.unwrap();
        r.title = "Better Soup".to_string();
        store.upsert_recipe(&r, &scope).await.unwrap();

        assert_eq!(store.recipe_count(), 1);
        assert_eq!(
            store.recipe_by_id(r.id).await.unwrap().unwrap().title,
            "Better Soup"
        );
    }

    #[tokio::test]
    async fn test_owner_without_profile_is_rejected() {
        let store = store_with_owners(&["alice"]).await;
        let err = store
            .upsert_recipe(&recipe("ghost", "soup"), &SlugScope::Global)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::UnknownOwner { ref owner } if owner == "ghost"));
        assert_eq!(store.recipe_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_requires_stored_owner() {
        let store = store_with_owners(&["alice"]).await;
        let r = recipe("alice", "soup");
        store.upsert_recipe(&r, &SlugScope::Global).await.unwrap();

        assert!(!store
            .delete_recipe(r.id, &ProfileId::new("bob"))
            .await
            .unwrap());
        assert!(store
            .delete_recipe(r.id, &ProfileId::new("alice"))
            .await
            .unwrap());
        assert!(store.recipe_by_id(r.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_username_is_unique_case_insensitively() {
        let store = MemoryStore::new();
        store
            .upsert_profile(&Profile {
                id: ProfileId::new("a"),
                username: "Chef".to_string(),
            })
            .await
            .unwrap();

        assert!(store.username_exists("chef").await.unwrap());
        let err = store
            .upsert_profile(&Profile {
                id: ProfileId::new("b"),
                username: "CHEF".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UsernameConflict { .. }));
    }
}
