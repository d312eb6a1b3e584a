// src/services/pricing_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, PricingRepository},
    models::pricing::{ClientPrice, SetPricesPayload},
};

#[derive(Clone)]
pub struct PricingService {
    repo: PricingRepository,
    client_repo: ClientRepository,
}

impl PricingService {
    pub fn new(repo: PricingRepository, client_repo: ClientRepository) -> Self {
        Self { repo, client_repo }
    }

    /// Preço unitário do cliente para a categoria. Sem preço, sem pedido.
    pub async fn resolve<'e, E>(&self, executor: E, client_id: Uuid, category_slug: &str) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_visible_price(executor, client_id, category_slug)
            .await?
            .ok_or_else(|| AppError::NoPriceConfigured(category_slug.to_string()))
    }

    pub async fn list_for_client<'e, E>(&self, executor: E, client_id: Uuid) -> Result<Vec<ClientPrice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_visible(executor, client_id).await
    }

    pub async fn set_prices<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        payload: &SetPricesPayload,
    ) -> Result<Vec<ClientPrice>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.client_repo
            .find_by_id(&mut *tx, client_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("client".into()))?;

        let mut prices = Vec::with_capacity(payload.prices.len());
        for price in &payload.prices {
            let saved = self
                .repo
                .upsert(
                    &mut *tx,
                    client_id,
                    &price.category_slug,
                    price.price_per_unit,
                    price.is_visible.unwrap_or(true),
                )
                .await?;
            prices.push(saved);
        }

        tx.commit().await?;

        tracing::info!(client_id = %client_id, count = prices.len(), "Tabela de preços atualizada");
        Ok(prices)
    }
}
