// src/db/charge_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{charge::ChargeRequest, review::ReviewStatus},
};

#[derive(Clone, Default)]
pub struct ChargeRepository;

impl ChargeRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        amount: i64,
        depositor_name: Option<&str>,
    ) -> Result<ChargeRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, ChargeRequest>(
            r#"
            INSERT INTO charge_requests (client_id, amount, depositor_name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(amount)
        .bind(depositor_name)
        .fetch_one(executor)
        .await?;

        Ok(request)
    }

    // Trava o pedido: duas revisões simultâneas não passam juntas
    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<ChargeRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, ChargeRequest>(
            "SELECT * FROM charge_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(request)
    }

    pub async fn mark_reviewed<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: ReviewStatus,
        reviewed_by: Uuid,
        rejection_reason: Option<&str>,
    ) -> Result<ChargeRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, ChargeRequest>(
            r#"
            UPDATE charge_requests
            SET status = $2, reviewed_by = $3, reviewed_at = NOW(), rejection_reason = $4
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(reviewed_by)
        .bind(rejection_reason)
        .fetch_optional(executor)
        .await?;

        request.ok_or(AppError::AlreadyProcessed)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        client_id: Option<Uuid>,
        status: Option<ReviewStatus>,
    ) -> Result<Vec<ChargeRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let requests = sqlx::query_as::<_, ChargeRequest>(
            r#"
            SELECT * FROM charge_requests
            WHERE ($1::uuid IS NULL OR client_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(client_id)
        .bind(status)
        .fetch_all(executor)
        .await?;

        Ok(requests)
    }
}
