//! AI client module for recipe extraction via an OpenAI-compatible API.
//!
//! This module provides:
//! - `AiClient` trait for abstracting the completion API
//! - `OpenAiClient`, the reqwest implementation, and `FakeAiClient` for tests
//! - `RecipeExtractor`, which turns photos or text into a `RecipeDraft`
//! - Configuration via environment variables (see [`AiConfig::from_env`])
//!
//! # Example
//!
//! ```ignore
//! use recipebox_core::ai::{AiConfig, OpenAiClient, RecipeExtractor};
//!
//! let client = OpenAiClient::new(AiConfig::from_env()?)?;
//! let extractor = RecipeExtractor::new(Arc::new(client));
//!
//! let draft = extractor.extract_from_text("Toast: toast bread.").await?;
//! println!("Extracted: {}", draft.title);
//! ```

mod client;
mod config;
mod fake;
pub mod prompts;
mod recipe_extract;
mod types;

pub use client::{AiClient, AiError, OpenAiClient};
pub use config::{AiConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
pub use fake::FakeAiClient;
pub use recipe_extract::{
    build_extract_request, decode_completion, recipe_response_format, recipe_response_schema,
    validate_input, ExtractError, ExtractionInput, RecipeExtractor, RECIPE_SCHEMA_NAME,
};
pub use types::{
    ChatCompletion, ChatMessage, ChatRequest, Choice, ChoiceMessage, ContentPart, ImageUrl,
    JsonSchema, JsonSchemaFormat, ResponseFormat, Role, SchemaProperty, Usage,
};
