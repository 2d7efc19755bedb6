use proptest::prelude::*;
use std::collections::BTreeSet;
use uuid::Uuid;

use recipebox_core::slug::{generate_unique_slug, normalize_title, SlugScope};
use recipebox_core::{MemoryStore, Recipe, RecipeStore};

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

fn stored(slug: String) -> Recipe {
    Recipe {
        id: Uuid::new_v4(),
        owner_id: None,
        title: slug.clone(),
        slug,
        ingredients: String::new(),
        instructions: String::new(),
        notes: None,
        cook_temp_deg_f: None,
        cook_time_minutes: None,
        tags: vec![],
    }
}

proptest! {
    #[test]
    fn prop_normalized_titles_use_slug_charset(title in any::<String>()) {
        let slug = normalize_title(&title);
        prop_assert!(slug.chars().all(is_slug_char), "{:?} -> {:?}", title, slug);
        prop_assert!(!slug.contains("--"));
    }

    #[test]
    fn prop_normalize_is_idempotent(title in any::<String>()) {
        let once = normalize_title(&title);
        prop_assert_eq!(normalize_title(&once), once);
    }

    #[test]
    fn prop_generated_slug_follows_highest_suffix(
        title in "\\PC{0,24}",
        bare_taken in any::<bool>(),
        suffixes in prop::collection::btree_set(1u64..10_000, 0..6),
    ) {
        let candidate = normalize_title(&title);
        let store = MemoryStore::new();
        let scope = SlugScope::Global;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let slug = runtime.block_on(async {
            let mut taken: BTreeSet<String> =
                suffixes.iter().map(|n| format!("{candidate}-{n}")).collect();
            if bare_taken {
                taken.insert(candidate.clone());
            }
            for slug in taken {
                store.upsert_recipe(&stored(slug), &scope).await.unwrap();
            }
            generate_unique_slug(&store, &title, &scope).await.unwrap()
        });

        if bare_taken {
            let next = suffixes.iter().max().copied().unwrap_or(0) + 1;
            prop_assert_eq!(slug, format!("{candidate}-{next}"));
        } else {
            prop_assert_eq!(slug, candidate);
        }
    }
}
