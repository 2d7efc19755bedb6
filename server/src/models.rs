use diesel::prelude::*;
use recipebox_core::{Profile, ProfileId, Recipe, RecipeCard};
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipe)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
    pub id: Uuid,
    pub profile_id: Option<String>,
    pub slug: String,
    pub title: String,
    pub ingredients: String,
    pub instructions: String,
    pub notes: Option<String>,
    pub cook_temp_deg_f: Option<i16>,
    pub cook_time_minutes: Option<i16>,
    pub tags: Vec<String>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: row.id,
            owner_id: row.profile_id.map(ProfileId),
            slug: row.slug,
            title: row.title,
            ingredients: row.ingredients,
            instructions: row.instructions,
            notes: row.notes,
            cook_temp_deg_f: row.cook_temp_deg_f,
            cook_time_minutes: row.cook_time_minutes,
            tags: row.tags,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe)]
pub struct NewRecipe<'a> {
    pub id: Uuid,
    pub profile_id: Option<&'a str>,
    pub slug: &'a str,
    pub slug_scope: &'a str,
    pub title: &'a str,
    pub ingredients: &'a str,
    pub instructions: &'a str,
    pub notes: Option<&'a str>,
    pub cook_temp_deg_f: Option<i16>,
    pub cook_time_minutes: Option<i16>,
    pub tags: &'a [String],
}

/// Columns replaced when an upsert hits an existing id. Absent optional
/// values overwrite with NULL.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipe)]
#[diesel(treat_none_as_null = true)]
pub struct RecipeChanges<'a> {
    pub profile_id: Option<&'a str>,
    pub slug: &'a str,
    pub slug_scope: &'a str,
    pub title: &'a str,
    pub ingredients: &'a str,
    pub instructions: &'a str,
    pub notes: Option<&'a str>,
    pub cook_temp_deg_f: Option<i16>,
    pub cook_time_minutes: Option<i16>,
    pub tags: &'a [String],
}

impl<'a> NewRecipe<'a> {
    pub fn new(recipe: &'a Recipe, slug_scope: &'a str) -> Self {
        Self {
            id: recipe.id,
            profile_id: recipe.owner_id.as_ref().map(ProfileId::as_str),
            slug: &recipe.slug,
            slug_scope,
            title: &recipe.title,
            ingredients: &recipe.ingredients,
            instructions: &recipe.instructions,
            notes: recipe.notes.as_deref(),
            cook_temp_deg_f: recipe.cook_temp_deg_f,
            cook_time_minutes: recipe.cook_time_minutes,
            tags: &recipe.tags,
        }
    }

    pub fn changes(&self) -> RecipeChanges<'a> {
        RecipeChanges {
            profile_id: self.profile_id,
            slug: self.slug,
            slug_scope: self.slug_scope,
            title: self.title,
            ingredients: self.ingredients,
            instructions: self.instructions,
            notes: self.notes,
            cook_temp_deg_f: self.cook_temp_deg_f,
            cook_time_minutes: self.cook_time_minutes,
            tags: self.tags,
        }
    }
}

#[derive(Queryable, Debug)]
pub struct RecipeCardRow {
    pub id: Uuid,
    pub username: String,
    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,
}

impl From<RecipeCardRow> for RecipeCard {
    fn from(row: RecipeCardRow) -> Self {
        RecipeCard {
            id: row.id,
            username: row.username,
            slug: row.slug,
            title: row.title,
            tags: row.tags,
        }
    }
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::profile)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProfileRow {
    pub id: String,
    pub username: String,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: ProfileId(row.id),
            username: row.username,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::profile)]
pub struct NewProfile<'a> {
    pub id: &'a str,
    pub username: &'a str,
}
