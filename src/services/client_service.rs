// src/services/client_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, db::ClientRepository, models::client::Client};

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
}

impl ClientService {
    pub fn new(repo: ClientRepository) -> Self {
        Self { repo }
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor).await
    }

    pub async fn set_auto_distribution<'e, E>(&self, executor: E, id: Uuid, approved: bool) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = self
            .repo
            .set_auto_distribution(executor, id, approved)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("client".into()))?;

        tracing::info!(client_id = %id, approved, "Distribuição automática atualizada");
        Ok(client)
    }
}
