// src/db/pricing_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::pricing::ClientPrice};

#[derive(Clone, Default)]
pub struct PricingRepository;

impl PricingRepository {
    pub fn new() -> Self {
        Self
    }

    /// Preço unitário visível para (cliente, categoria), se houver.
    pub async fn find_visible_price<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        category_slug: &str,
    ) -> Result<Option<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let price = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT price_per_unit FROM client_prices
            WHERE client_id = $1 AND category_slug = $2 AND is_visible
            "#,
        )
        .bind(client_id)
        .bind(category_slug)
        .fetch_optional(executor)
        .await?;

        Ok(price)
    }

    pub async fn list_visible<'e, E>(&self, executor: E, client_id: Uuid) -> Result<Vec<ClientPrice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let prices = sqlx::query_as::<_, ClientPrice>(
            r#"
            SELECT * FROM client_prices
            WHERE client_id = $1 AND is_visible
            ORDER BY category_slug ASC
            "#,
        )
        .bind(client_id)
        .fetch_all(executor)
        .await?;

        Ok(prices)
    }

    pub async fn upsert<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        category_slug: &str,
        price_per_unit: i64,
        is_visible: bool,
    ) -> Result<ClientPrice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let price = sqlx::query_as::<_, ClientPrice>(
            r#"
            INSERT INTO client_prices (client_id, category_slug, price_per_unit, is_visible)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (client_id, category_slug) DO UPDATE
            SET price_per_unit = EXCLUDED.price_per_unit,
                is_visible = EXCLUDED.is_visible,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(category_slug)
        .bind(price_per_unit)
        .bind(is_visible)
        .fetch_one(executor)
        .await?;

        Ok(price)
    }
}
