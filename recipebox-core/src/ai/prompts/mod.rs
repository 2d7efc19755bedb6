//! AI prompt templates.

pub mod recipe_extract;

pub use recipe_extract::{render_image_extract_prompt, render_text_extract_prompt, TAG_VOCABULARY};
