//! PostgreSQL implementation of the persistence gateway.

use async_trait::async_trait;
use diesel::dsl::{exists, now};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Text;
use recipebox_core::slug::SlugScope;
use recipebox_core::store::{RecipeStore, StoreError};
use recipebox_core::{Profile, ProfileId, Recipe, RecipeCard};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{NewProfile, NewRecipe, ProfileRow, RecipeCardRow, RecipeRow};
use crate::schema::{profile, recipe};

diesel::define_sql_function!(fn lower(x: Text) -> Text);

type Conn = diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>;

pub struct PgStore {
    pool: Arc<DbPool>,
}

impl PgStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<Conn, StoreError> {
        self.pool.get().map_err(|e| {
            tracing::error!("Database connection failed: {}", e);
            StoreError::Connection(e.to_string())
        })
    }
}

fn query_error(e: DieselError) -> StoreError {
    tracing::error!("Database query failed: {}", e);
    StoreError::Query(e.to_string())
}

fn is_unique_violation(e: &DieselError) -> bool {
    matches!(
        e,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

#[async_trait]
impl RecipeStore for PgStore {
    async fn recipe_by_id(&self, id: Uuid) -> Result<Option<Recipe>, StoreError> {
        let mut conn = self.conn()?;

        let row = recipe::table
            .find(id)
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(query_error)?;

        Ok(row.map(Recipe::from))
    }

    async fn recipe_by_slug(
        &self,
        owner_username: Option<&str>,
        slug: &str,
    ) -> Result<Option<Recipe>, StoreError> {
        let mut conn = self.conn()?;
        let slug = slug.to_lowercase();

        let row = match owner_username {
            Some(username) => recipe::table
                .inner_join(profile::table)
                .filter(lower(profile::username).eq(username.to_lowercase()))
                .filter(lower(recipe::slug).eq(&slug))
                .select(RecipeRow::as_select())
                .first(&mut conn)
                .optional(),
            None => recipe::table
                .filter(recipe::profile_id.is_null())
                .filter(lower(recipe::slug).eq(&slug))
                .select(RecipeRow::as_select())
                .first(&mut conn)
                .optional(),
        }
        .map_err(query_error)?;

        Ok(row.map(Recipe::from))
    }

    async fn list_recipe_cards(
        &self,
        owner_username: Option<&str>,
    ) -> Result<Vec<RecipeCard>, StoreError> {
        let mut conn = self.conn()?;

        let mut query = recipe::table
            .inner_join(profile::table)
            .select((
                recipe::id,
                profile::username,
                recipe::slug,
                recipe::title,
                recipe::tags,
            ))
            .order((recipe::title.asc(), recipe::id.asc()))
            .into_boxed();

        if let Some(username) = owner_username {
            query = query.filter(lower(profile::username).eq(username.to_lowercase()));
        }

        let rows: Vec<RecipeCardRow> = query.load(&mut conn).map_err(query_error)?;

        Ok(rows.into_iter().map(RecipeCard::from).collect())
    }

    async fn upsert_recipe(
        &self,
        recipe: &Recipe,
        scope: &SlugScope,
    ) -> Result<Recipe, StoreError> {
        let mut conn = self.conn()?;
        let new_recipe = NewRecipe::new(recipe, scope.key());

        let row = diesel::insert_into(recipe::table)
            .values(&new_recipe)
            .on_conflict(recipe::id)
            .do_update()
            .set((new_recipe.changes(), recipe::updated_at.eq(now)))
            .returning(RecipeRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    StoreError::SlugConflict {
                        slug: recipe.slug.clone(),
                    }
                }
                DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                    StoreError::UnknownOwner {
                        owner: new_recipe.profile_id.unwrap_or_default().to_string(),
                    }
                }
                other => query_error(other),
            })?;

        Ok(row.into())
    }

    async fn delete_recipe(&self, id: Uuid, owner: &ProfileId) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            recipe::table
                .filter(recipe::id.eq(id))
                .filter(recipe::profile_id.eq(owner.as_str())),
        )
        .execute(&mut conn)
        .map_err(query_error)?;

        Ok(deleted > 0)
    }

    async fn slug_exists(&self, scope: &SlugScope, slug: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;

        diesel::select(exists(
            recipe::table
                .filter(recipe::slug_scope.eq(scope.key()))
                .filter(lower(recipe::slug).eq(slug.to_lowercase())),
        ))
        .get_result(&mut conn)
        .map_err(query_error)
    }

    async fn slugs_with_prefix(
        &self,
        scope: &SlugScope,
        candidate: &str,
    ) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn()?;
        let candidate = candidate.to_lowercase();
        // Normalized candidates only contain [a-z0-9-], so no LIKE escaping is needed.
        let pattern = format!("{}-%", candidate);

        recipe::table
            .filter(recipe::slug_scope.eq(scope.key()))
            .filter(
                lower(recipe::slug)
                    .eq(&candidate)
                    .or(lower(recipe::slug).like(&pattern)),
            )
            .select(lower(recipe::slug))
            .load(&mut conn)
            .map_err(query_error)
    }

    async fn profile(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        let mut conn = self.conn()?;

        let row = profile::table
            .find(id.as_str())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(query_error)?;

        Ok(row.map(Profile::from))
    }

    async fn profile_by_username(&self, username: &str) -> Result<Option<Profile>, StoreError> {
        let mut conn = self.conn()?;

        let row = profile::table
            .filter(profile::username.ne(""))
            .filter(lower(profile::username).eq(username.to_lowercase()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(query_error)?;

        Ok(row.map(Profile::from))
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, StoreError> {
        let mut conn = self.conn()?;
        let new_profile = NewProfile {
            id: profile.id.as_str(),
            username: &profile.username,
        };

        let row = diesel::insert_into(profile::table)
            .values(&new_profile)
            .on_conflict(profile::id)
            .do_update()
            .set((
                profile::username.eq(&profile.username),
                profile::updated_at.eq(now),
            ))
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::UsernameConflict {
                        username: profile.username.clone(),
                    }
                } else {
                    query_error(e)
                }
            })?;

        Ok(row.into())
    }
}
