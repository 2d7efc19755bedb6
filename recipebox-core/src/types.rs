use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity of a profile, issued by the external auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    pub id: Uuid,
    #[serde(rename = "profile_id", default)]
    pub owner_id: Option<ProfileId>,
    #[serde(default)]
    pub slug: String,
    pub title: String,
    /// Markdown bullet list, one ingredient per line.
    pub ingredients: String,
    /// Markdown numbered list.
    pub instructions: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cook_temp_deg_f: Option<i16>,
    #[serde(default)]
    pub cook_time_minutes: Option<i16>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A recipe as decoded from the model's answer.
///
/// The `id` is whatever the model echoed back and is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub ingredients: String,
    pub instructions: String,
    pub cook_temp_deg_f: Option<i16>,
    pub cook_time_minutes: Option<i16>,
    pub tags: Vec<String>,
}

impl RecipeDraft {
    /// Turn the draft into a recipe owned by `owner`, with a fresh id.
    pub fn into_recipe(self, owner: ProfileId, slug: String) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            owner_id: Some(owner),
            slug,
            title: self.title,
            ingredients: self.ingredients,
            instructions: self.instructions,
            notes: None,
            cook_temp_deg_f: self.cook_temp_deg_f,
            cook_time_minutes: self.cook_time_minutes,
            tags: self.tags,
        }
    }
}

/// Listing projection of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeCard {
    pub id: Uuid,
    pub username: String,
    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub id: ProfileId,
    /// Empty until the owner picks one.
    #[serde(default)]
    pub username: String,
}

/// An uploaded image, base64 encoded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileUpload {
    #[serde(default)]
    pub filename: String,
    #[serde(alias = "mimeType")]
    pub mime_type: String,
    #[serde(alias = "base64Content")]
    pub content: String,
}

impl FileUpload {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.content)
    }
}

/// Where a freshly created recipe can be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GeneratedRecipe {
    pub username: String,
    pub slug: String,
}
