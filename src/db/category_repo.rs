// src/db/category_repo.rs

use sqlx::{types::Json, Executor, Postgres};

use crate::{
    common::{db_utils::unique_violation, error::AppError},
    models::category::{CategoryField, DynamicCategory},
};

#[derive(Clone, Default)]
pub struct CategoryRepository;

impl CategoryRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        slug: &str,
        name: &str,
        fields: &[CategoryField],
        quantity_field: &str,
    ) -> Result<DynamicCategory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, DynamicCategory>(
            r#"
            INSERT INTO dynamic_categories (slug, name, fields, quantity_field)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(name)
        .bind(Json(fields))
        .bind(quantity_field)
        .fetch_one(executor)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some("dynamic_categories_slug_key") => {
                AppError::InvalidState(format!("category '{}' already exists", slug))
            }
            _ => e.into(),
        })?;

        Ok(category)
    }

    pub async fn find_active_by_slug<'e, E>(
        &self,
        executor: E,
        slug: &str,
    ) -> Result<Option<DynamicCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, DynamicCategory>(
            "SELECT * FROM dynamic_categories WHERE slug = $1 AND is_active",
        )
        .bind(slug)
        .fetch_optional(executor)
        .await?;

        Ok(category)
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<DynamicCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories = sqlx::query_as::<_, DynamicCategory>(
            "SELECT * FROM dynamic_categories WHERE is_active ORDER BY name ASC",
        )
        .fetch_all(executor)
        .await?;

        Ok(categories)
    }
}
