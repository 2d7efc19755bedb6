//! Human-readable, URL-safe recipe identifiers.
//!
//! A slug is derived from the recipe title and must be unique within its
//! [`SlugScope`]. Generation is check-then-use: two writers racing on the same
//! title can compute the same slug. The store's unique index catches the loser,
//! which then regenerates (see [`MAX_SLUG_ATTEMPTS`]).

use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::store::{RecipeStore, StoreError};
use crate::types::ProfileId;

/// How many times a generated slug is recomputed after losing a race.
pub const MAX_SLUG_ATTEMPTS: usize = 5;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid slug regex"));

/// The uniqueness domain a slug is checked against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlugScope {
    Global,
    Owner(ProfileId),
}

impl SlugScope {
    /// Key persisted next to the slug; the global scope is the empty key.
    pub fn key(&self) -> &str {
        match self {
            SlugScope::Global => "",
            SlugScope::Owner(id) => id.as_str(),
        }
    }
}

/// Which scope new slugs are registered under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlugScopeMode {
    Global,
    #[default]
    PerOwner,
}

impl SlugScopeMode {
    pub fn scope_for(&self, owner: Option<&ProfileId>) -> SlugScope {
        match (self, owner) {
            (SlugScopeMode::PerOwner, Some(owner)) => SlugScope::Owner(owner.clone()),
            _ => SlugScope::Global,
        }
    }
}

impl fmt::Display for SlugScopeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlugScopeMode::Global => f.write_str("global"),
            SlugScopeMode::PerOwner => f.write_str("per_owner"),
        }
    }
}

impl FromStr for SlugScopeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "global" => Ok(SlugScopeMode::Global),
            "per_owner" | "per-owner" | "owner" => Ok(SlugScopeMode::PerOwner),
            other => Err(format!("unknown slug scope '{}'", other)),
        }
    }
}

/// Lowercase the title and collapse every run of characters outside
/// `[a-z0-9]` into a single hyphen. Leading and trailing hyphens are kept.
pub fn normalize_title(title: &str) -> String {
    NON_SLUG_CHARS
        .replace_all(&title.to_lowercase(), "-")
        .into_owned()
}

/// True if `slug` is already in normalized form.
pub fn is_normalized(slug: &str) -> bool {
    !slug.is_empty() && normalize_title(slug) == slug
}

/// Largest integer suffix among `slugs` of the form `candidate-<digits>`.
///
/// The bare candidate and suffixes that are empty or not purely digits
/// contribute 0.
pub fn max_numeric_suffix<S: AsRef<str>>(candidate: &str, slugs: &[S]) -> u64 {
    slugs
        .iter()
        .filter_map(|slug| {
            let suffix = slug.as_ref().strip_prefix(candidate)?.strip_prefix('-')?;
            if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            suffix.parse::<u64>().ok()
        })
        .max()
        .unwrap_or(0)
}

/// Compute a slug for `title` that is not yet used in `scope`.
pub async fn generate_unique_slug(
    store: &dyn RecipeStore,
    title: &str,
    scope: &SlugScope,
) -> Result<String, StoreError> {
    let candidate = normalize_title(title);

    if !store.slug_exists(scope, &candidate).await? {
        return Ok(candidate);
    }

    let existing = store.slugs_with_prefix(scope, &candidate).await?;
    let next = max_numeric_suffix(&candidate, &existing).saturating_add(1);

    Ok(format!("{}-{}", candidate, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{Profile, Recipe};
    use uuid::Uuid;

    async fn insert(store: &MemoryStore, scope: &SlugScope, slug: &str) {
        let owner_id = match scope {
            SlugScope::Global => None,
            SlugScope::Owner(id) => Some(id.clone()),
        };
        if let Some(id) = &owner_id {
            store
                .upsert_profile(&Profile {
                    id: id.clone(),
                    username: id.to_string(),
                })
                .await
                .unwrap();
        }
        let recipe = Recipe {
            id: Uuid::new_v4(),
            owner_id,
            slug: slug.to_string(),
            title: slug.to_string(),
            ingredients: String::new(),
            instructions: String::new(),
            notes: None,
            cook_temp_deg_f: None,
            cook_time_minutes: None,
            tags: vec![],
        };
        store.upsert_recipe(&recipe, scope).await.unwrap();
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("Banana Bread"), "banana-bread");
        assert_eq!(normalize_title("Banana Bread!!"), "banana-bread-");
        assert_eq!(normalize_title("  Mom's  Chili "), "-mom-s-chili-");
        assert_eq!(normalize_title("Crème Brûlée"), "cr-me-br-l-e");
        assert_eq!(normalize_title("7-Layer Dip"), "7-layer-dip");
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for title in ["Banana Bread", "  Mom's  Chili ", "PB&J", "a--b", "Ünïcödé"] {
            let once = normalize_title(title);
            assert_eq!(normalize_title(&once), once, "title: {:?}", title);
        }
    }

    #[test]
    fn test_is_normalized() {
        assert!(is_normalized("banana-bread-2"));
        assert!(!is_normalized("Banana-Bread"));
        assert!(!is_normalized("banana bread"));
        assert!(!is_normalized(""));
    }

    #[test]
    fn test_max_numeric_suffix_ignores_non_numeric() {
        let slugs = [
            "banana-bread",
            "banana-bread-3",
            "banana-bread-",
            "banana-bread-x",
            "banana-bread-2-1",
            "banana-bread-+9",
            "banana-breadsticks-12",
        ];
        assert_eq!(max_numeric_suffix("banana-bread", &slugs), 3);
    }

    #[test]
    fn test_max_numeric_suffix_of_nothing_is_zero() {
        let slugs: [&str; 0] = [];
        assert_eq!(max_numeric_suffix("soup", &slugs), 0);
        assert_eq!(max_numeric_suffix("soup", &["soup"]), 0);
    }

    #[test]
    fn test_scope_mode_from_str() {
        assert_eq!("global".parse::<SlugScopeMode>(), Ok(SlugScopeMode::Global));
        assert_eq!(
            "per_owner".parse::<SlugScopeMode>(),
            Ok(SlugScopeMode::PerOwner)
        );
        assert!("tenant".parse::<SlugScopeMode>().is_err());
    }

    #[test]
    fn test_global_mode_ignores_owner() {
        let owner = ProfileId::new("alice");
        assert_eq!(
            SlugScopeMode::Global.scope_for(Some(&owner)),
            SlugScope::Global
        );
        assert_eq!(
            SlugScopeMode::PerOwner.scope_for(Some(&owner)),
            SlugScope::Owner(owner)
        );
        assert_eq!(SlugScopeMode::PerOwner.scope_for(None), SlugScope::Global);
    }

    #[tokio::test]
    async fn test_empty_scope_returns_candidate() {
        let store = MemoryStore::new();
        let slug = generate_unique_slug(&store, "Banana Bread", &SlugScope::Global)
            .await
            .unwrap();
        assert_eq!(slug, "banana-bread");
    }

    #[tokio::test]
    async fn test_collision_takes_next_after_max_suffix() {
        let store = MemoryStore::new();
        let scope = SlugScope::Owner(ProfileId::new("alice"));
        insert(&store, &scope, "banana-bread").await;
        insert(&store, &scope, "banana-bread-3").await;

        let slug = generate_unique_slug(&store, "Banana Bread", &scope)
            .await
            .unwrap();
        assert_eq!(slug, "banana-bread-4");
    }

    #[tokio::test]
    async fn test_punctuated_title_gets_its_own_candidate() {
        let store = MemoryStore::new();
        let scope = SlugScope::Global;
        insert(&store, &scope, "banana-bread").await;
        insert(&store, &scope, "banana-bread-3").await;

        // "!!" becomes a trailing hyphen, which is a distinct slug
        let slug = generate_unique_slug(&store, "Banana Bread!!", &scope)
            .await
            .unwrap();
        assert_eq!(slug, "banana-bread-");
    }

    #[tokio::test]
    async fn test_trailing_hyphen_is_kept_in_candidate() {
        let store = MemoryStore::new();
        let scope = SlugScope::Global;
        insert(&store, &scope, "banana-bread-").await;

        let slug = generate_unique_slug(&store, "Banana Bread!!", &scope)
            .await
            .unwrap();
        assert_eq!(slug, "banana-bread--1");
    }

    #[tokio::test]
    async fn test_other_scopes_do_not_collide() {
        let store = MemoryStore::new();
        let alice = SlugScope::Owner(ProfileId::new("alice"));
        let bob = SlugScope::Owner(ProfileId::new("bob"));
        insert(&store, &alice, "soup").await;
        insert(&store, &alice, "soup-7").await;

        assert_eq!(
            generate_unique_slug(&store, "Soup", &bob).await.unwrap(),
            "soup"
        );
        assert_eq!(
            generate_unique_slug(&store, "Soup", &alice).await.unwrap(),
            "soup-8"
        );
    }
}
