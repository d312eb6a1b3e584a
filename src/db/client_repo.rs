// src/db/client_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::client::Client};

#[derive(Clone, Default)]
pub struct ClientRepository;

impl ClientRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        company_name: &str,
        business_number: Option<&str>,
        contact_name: Option<&str>,
        contact_phone: Option<&str>,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (company_name, business_number, contact_name, contact_phone)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_name)
        .bind(business_number)
        .bind(contact_name)
        .bind(contact_phone)
        .fetch_one(executor)
        .await?;

        Ok(client)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(client)
    }

    /// Trava a linha do cliente até o fim da transação.
    /// Todo lançamento no livro-razão passa por aqui.
    pub async fn lock_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(client)
    }

    pub async fn set_points<'e, E>(&self, executor: E, id: Uuid, points: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE clients SET points = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(points)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Recalcula o contador a partir da tabela, nunca por incremento.
    pub async fn refresh_pending_charge_count<'e, E>(&self, executor: E, id: Uuid) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE clients
            SET pending_charge_requests_count = (
                    SELECT COUNT(*)::INT FROM charge_requests
                    WHERE client_id = $1 AND status = 'pending'
                ),
                updated_at = NOW()
            WHERE id = $1
            RETURNING pending_charge_requests_count
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let clients = sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY company_name ASC")
            .fetch_all(executor)
            .await?;

        Ok(clients)
    }

    pub async fn set_auto_distribution<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        approved: bool,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET auto_distribution_approved = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(approved)
        .fetch_optional(executor)
        .await?;

        Ok(client)
    }
}
