// src/services/category_service.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    db::CategoryRepository,
    models::category::{CreateCategoryPayload, DynamicCategory},
};

#[derive(Clone)]
pub struct CategoryService {
    repo: CategoryRepository,
}

impl CategoryService {
    pub fn new(repo: CategoryRepository) -> Self {
        Self { repo }
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &CreateCategoryPayload) -> Result<DynamicCategory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        payload.check_schema()?;

        self.repo
            .create(executor, &payload.slug, &payload.name, &payload.fields, &payload.quantity_field)
            .await
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<DynamicCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor).await
    }

    pub async fn find_active<'e, E>(&self, executor: E, slug: &str) -> Result<DynamicCategory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_active_by_slug(executor, slug)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("category '{}'", slug)))
    }
}
