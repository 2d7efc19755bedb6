//! Recipe extraction from photos or pasted text using a vision-capable model.
//!
//! The request declares a strict JSON schema for the answer, so the first
//! choice's content can be decoded straight into a [`RecipeDraft`].

use base64::{engine::general_purpose::STANDARD, Engine};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::ai::prompts::{render_image_extract_prompt, render_text_extract_prompt};
use crate::ai::{
    AiClient, AiError, ChatCompletion, ChatMessage, ChatRequest, ContentPart, JsonSchema,
    JsonSchemaFormat, ResponseFormat, SchemaProperty,
};
use crate::types::{FileUpload, RecipeDraft};

pub const RECIPE_SCHEMA_NAME: &str = "recipe_response";

/// Required fields of the answer, in the order they are declared.
const REQUIRED_FIELDS: [&str; 7] = [
    "id",
    "title",
    "ingredients",
    "instructions",
    "cook_temp_deg_f",
    "cook_time_minutes",
    "tags",
];

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid extraction input: {0}")]
    InvalidInput(String),

    #[error("Upstream model call failed: {0}")]
    Upstream(#[source] AiError),

    #[error("Model answer does not match the recipe schema: {0}")]
    Decode(String),

    #[error("Model returned no answer")]
    EmptyResponse,
}

impl From<AiError> for ExtractError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::Parse(message) => ExtractError::Decode(message),
            other => ExtractError::Upstream(other),
        }
    }
}

/// What the model is asked to read.
#[derive(Debug, Clone, Copy)]
pub enum ExtractionInput<'a> {
    Images(&'a [FileUpload]),
    Text(&'a str),
}

impl ExtractionInput<'_> {
    /// Short label used in logs and error context.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionInput::Images(_) => "images",
            ExtractionInput::Text(_) => "text",
        }
    }
}

pub fn recipe_response_schema() -> JsonSchema {
    let properties: BTreeMap<String, SchemaProperty> = [
        ("id", SchemaProperty::of("string")),
        ("title", SchemaProperty::of("string")),
        ("ingredients", SchemaProperty::of("string")),
        ("instructions", SchemaProperty::of("string")),
        ("cook_temp_deg_f", SchemaProperty::of("integer")),
        ("cook_time_minutes", SchemaProperty::of("integer")),
        ("tags", SchemaProperty::array_of(SchemaProperty::of("string"))),
    ]
    .into_iter()
    .map(|(name, property)| (name.to_string(), property))
    .collect();

    JsonSchema {
        kind: "object".to_string(),
        properties,
        required: REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
        additional_properties: false,
    }
}

pub fn recipe_response_format() -> ResponseFormat {
    ResponseFormat::JsonSchema {
        json_schema: JsonSchemaFormat {
            name: RECIPE_SCHEMA_NAME.to_string(),
            schema: recipe_response_schema(),
            strict: true,
        },
    }
}

/// Reject input that cannot produce a useful request.
pub fn validate_input(input: ExtractionInput<'_>) -> Result<(), ExtractError> {
    match input {
        ExtractionInput::Images(files) => {
            if files.is_empty() {
                return Err(ExtractError::InvalidInput(
                    "At least one file is required".to_string(),
                ));
            }
            for file in files {
                if !file.mime_type.starts_with("image/") {
                    return Err(ExtractError::InvalidInput(format!(
                        "File '{}' has unsupported type '{}'",
                        file.filename, file.mime_type
                    )));
                }
                if file.content.is_empty() || STANDARD.decode(&file.content).is_err() {
                    return Err(ExtractError::InvalidInput(format!(
                        "File '{}' is not valid base64",
                        file.filename
                    )));
                }
            }
            Ok(())
        }
        ExtractionInput::Text(text) => {
            if text.trim().is_empty() {
                return Err(ExtractError::InvalidInput(
                    "Recipe text cannot be empty".to_string(),
                ));
            }
            Ok(())
        }
    }
}

/// Build the single chat request for `input`: the prompt first, then either
/// one image part per file or the pasted text.
pub fn build_extract_request(
    input: ExtractionInput<'_>,
    model: &str,
    max_tokens: u32,
) -> ChatRequest {
    let parts = match input {
        ExtractionInput::Images(files) => {
            let mut parts = Vec::with_capacity(files.len() + 1);
            parts.push(ContentPart::text(render_image_extract_prompt()));
            parts.extend(files.iter().map(|f| ContentPart::image_url(f.data_uri())));
            parts
        }
        ExtractionInput::Text(text) => vec![
            ContentPart::text(render_text_extract_prompt()),
            ContentPart::text(text),
        ],
    };

    ChatRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::user(parts)],
        max_tokens,
        response_format: Some(recipe_response_format()),
    }
}

/// Decode the first choice of `completion` into a draft.
pub fn decode_completion(completion: ChatCompletion) -> Result<RecipeDraft, ExtractError> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or(ExtractError::EmptyResponse)?;

    let content = choice
        .message
        .content
        .ok_or_else(|| ExtractError::Decode("First choice has no content".to_string()))?;

    let draft: RecipeDraft =
        serde_json::from_str(&content).map_err(|e| ExtractError::Decode(e.to_string()))?;

    // A blank title would normalize to an empty slug.
    if draft.title.trim().is_empty() {
        return Err(ExtractError::Decode("Recipe has no title".to_string()));
    }
    Ok(draft)
}

/// Turns uploads or text into recipe drafts with one model call each.
#[derive(Clone)]
pub struct RecipeExtractor {
    client: Arc<dyn AiClient>,
}

impl RecipeExtractor {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self { client }
    }

    pub async fn extract(&self, input: ExtractionInput<'_>) -> Result<RecipeDraft, ExtractError> {
        validate_input(input)?;

        let request =
            build_extract_request(input, self.client.model_name(), self.client.max_tokens());
        let completion = self.client.complete(request).await?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                input = input.kind(),
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Recipe extraction completed"
            );
        }

        decode_completion(completion)
    }

    pub async fn extract_from_images(
        &self,
        files: &[FileUpload],
    ) -> Result<RecipeDraft, ExtractError> {
        self.extract(ExtractionInput::Images(files)).await
    }

    pub async fn extract_from_text(&self, text: &str) -> Result<RecipeDraft, ExtractError> {
        self.extract(ExtractionInput::Text(text)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeAiClient;

    const DRAFT_JSON: &str = r#"{
        "id": "model-made-this-up",
        "title": "Banana Bread",
        "ingredients": "* 3 ripe bananas\n* **1 cup** flour\n",
        "instructions": "1. Mash bananas.\n2. Bake at 350F.\n",
        "cook_temp_deg_f": 350,
        "cook_time_minutes": 60,
        "tags": ["Bread", "Breakfast"]
    }"#;

    fn image(name: &str) -> FileUpload {
        FileUpload {
            filename: name.to_string(),
            mime_type: "image/png".to_string(),
            content: "iVBORw0KGgo=".to_string(),
        }
    }

    #[test]
    fn test_schema_serializes_exactly() {
        let json = serde_json::to_string(&recipe_response_schema()).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"type":"object","properties":{"#,
                r#""cook_temp_deg_f":{"type":"integer"},"#,
                r#""cook_time_minutes":{"type":"integer"},"#,
                r#""id":{"type":"string"},"#,
                r#""ingredients":{"type":"string"},"#,
                r#""instructions":{"type":"string"},"#,
                r#""tags":{"type":"array","items":{"type":"string"}},"#,
                r#""title":{"type":"string"}},"#,
                r#""required":["id","title","ingredients","instructions","cook_temp_deg_f","cook_time_minutes","tags"],"#,
                r#""additionalProperties":false}"#
            )
        );
    }

    #[test]
    fn test_response_format_is_strict_json_schema() {
        let value = serde_json::to_value(recipe_response_format()).unwrap();
        assert_eq!(value["type"], "json_schema");
        assert_eq!(value["json_schema"]["name"], "recipe_response");
        assert_eq!(value["json_schema"]["strict"], true);
    }

    #[test]
    fn test_image_request_inlines_data_uris_after_prompt() {
        let files = [image("a.png"), image("b.png")];
        let request = build_extract_request(ExtractionInput::Images(&files), "gpt-4o-mini", 2000);
        let value = serde_json::to_value(&request).unwrap();

        let content = value["messages"][0]["content"].as_array().unwrap();
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(
            content[1]["image_url"]["url"],
            "data:image/png;base64,iVBORw0KGgo="
        );
        assert_eq!(value["max_tokens"], 2000);
        assert_eq!(value["response_format"]["type"], "json_schema");
    }

    #[test]
    fn test_text_request_has_prompt_then_text() {
        let request = build_extract_request(ExtractionInput::Text("Mix it all."), "m", 10);
        let parts = &request.messages[0].content;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1], ContentPart::text("Mix it all."));
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let empty: [FileUpload; 0] = [];
        assert!(validate_input(ExtractionInput::Images(&empty)).is_err());

        let mut pdf = image("scan.pdf");
        pdf.mime_type = "application/pdf".to_string();
        assert!(validate_input(ExtractionInput::Images(&[pdf])).is_err());

        let mut garbled = image("x.png");
        garbled.content = "not base64!".to_string();
        assert!(validate_input(ExtractionInput::Images(&[garbled])).is_err());

        assert!(validate_input(ExtractionInput::Text("   \n")).is_err());
        assert!(validate_input(ExtractionInput::Images(&[image("ok.png")])).is_ok());
    }

    #[tokio::test]
    async fn test_extract_decodes_draft_preserving_order_and_markdown() {
        let client = Arc::new(FakeAiClient::with_content(DRAFT_JSON));
        let extractor = RecipeExtractor::new(client.clone());

        let draft = extractor
            .extract_from_images(&[image("page1.png")])
            .await
            .unwrap();

        assert_eq!(draft.title, "Banana Bread");
        assert_eq!(draft.tags, vec!["Bread", "Breakfast"]);
        assert_eq!(draft.ingredients, "* 3 ripe bananas\n* **1 cup** flour\n");
        assert_eq!(draft.cook_temp_deg_f, Some(350));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_extract_maps_upstream_status() {
        let extractor = RecipeExtractor::new(Arc::new(FakeAiClient::with_status(500, "boom")));
        let err = extractor.extract_from_text("Toast").await.unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Upstream(AiError::Api { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_extract_maps_transport_failure() {
        let extractor =
            RecipeExtractor::new(Arc::new(FakeAiClient::with_transport_error("timed out")));
        let err = extractor.extract_from_text("Toast").await.unwrap_err();
        assert!(matches!(err, ExtractError::Upstream(AiError::Request(_))));
    }

    #[tokio::test]
    async fn test_extract_with_no_choices_is_empty_response() {
        let extractor = RecipeExtractor::new(Arc::new(FakeAiClient::with_completion(
            ChatCompletion::default(),
        )));
        let err = extractor.extract_from_text("Toast").await.unwrap_err();
        assert!(matches!(err, ExtractError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_extract_with_schema_violation_is_decode_error() {
        let extractor = RecipeExtractor::new(Arc::new(FakeAiClient::with_content(
            r#"{"title": "Toast", "tags": "Bread"}"#,
        )));
        let err = extractor.extract_from_text("Toast").await.unwrap_err();
        assert!(matches!(err, ExtractError::Decode(_)));
    }

    #[tokio::test]
    async fn test_extract_with_blank_title_is_decode_error() {
        let content = DRAFT_JSON.replace("Banana Bread", "  ");
        let extractor = RecipeExtractor::new(Arc::new(FakeAiClient::with_content(&content)));
        let err = extractor.extract_from_text("Toast").await.unwrap_err();
        assert!(matches!(err, ExtractError::Decode(ref m) if m == "Recipe has no title"));
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_call() {
        let client = Arc::new(FakeAiClient::with_content(DRAFT_JSON));
        let extractor = RecipeExtractor::new(client.clone());

        let err = extractor.extract_from_images(&[]).await.unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput(_)));
        assert_eq!(client.call_count(), 0);
    }
}
