pub mod ai;
pub mod config;
pub mod error;
pub mod identity;
pub mod service;
pub mod slug;
pub mod store;
pub mod types;

pub use ai::{AiClient, AiConfig, ExtractError, FakeAiClient, OpenAiClient, RecipeExtractor};
pub use error::ServiceError;
pub use identity::{CallerIdentity, IdentityError, IdentityProvider, StaticIdentityProvider};
pub use service::RecipeService;
pub use slug::{generate_unique_slug, normalize_title, SlugScope, SlugScopeMode};
pub use store::{MemoryStore, RecipeStore, StoreError};
pub use types::{
    FileUpload, GeneratedRecipe, Profile, ProfileId, Recipe, RecipeCard, RecipeDraft,
};
