// src/db/points_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::unique_violation, error::AppError},
    models::points::{NewPosting, PointTransaction},
};

// Livro-razão de pontos. Só existe INSERT e leitura.
#[derive(Clone, Default)]
pub struct PointsRepository;

impl PointsRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        posting: &NewPosting,
        balance_after: i64,
    ) -> Result<PointTransaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, PointTransaction>(
            r#"
            INSERT INTO point_transactions (
                client_id, amount, kind, reference_id, balance_after, description, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(posting.client_id)
        .bind(posting.amount)
        .bind(posting.kind)
        .bind(posting.reference_id)
        .bind(balance_after)
        .bind(posting.description.as_deref())
        .bind(posting.created_by)
        .fetch_one(executor)
        .await
        .map_err(|e| match unique_violation(&e) {
            // A mesma entidade já gerou este lançamento
            Some("idx_point_transactions_reference") => AppError::AlreadyProcessed,
            _ => e.into(),
        })?;

        Ok(entry)
    }

    /// Histórico mais recente primeiro. `client_id = None` lista todos (admin).
    pub async fn list<'e, E>(
        &self,
        executor: E,
        client_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PointTransaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, PointTransaction>(
            r#"
            SELECT * FROM point_transactions
            WHERE ($1::uuid IS NULL OR client_id = $1)
              AND ($2::date IS NULL OR created_at >= $2::date)
              AND ($3::date IS NULL OR created_at < $3::date + 1)
            ORDER BY created_at DESC, id DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(client_id)
        .bind(from)
        .bind(to)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?;

        Ok(entries)
    }

    /// Lançamentos de um cliente em ordem cronológica (extrato).
    pub async fn list_chronological<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<PointTransaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, PointTransaction>(
            r#"
            SELECT * FROM point_transactions
            WHERE client_id = $1
              AND ($2::date IS NULL OR created_at >= $2::date)
              AND ($3::date IS NULL OR created_at < $3::date + 1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(client_id)
        .bind(from)
        .bind(to)
        .fetch_all(executor)
        .await?;

        Ok(entries)
    }

    #[cfg(test)]
    pub async fn sum_for_client<'e, E>(&self, executor: E, client_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sum = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM point_transactions WHERE client_id = $1",
        )
        .bind(client_id)
        .fetch_one(executor)
        .await?;

        Ok(sum)
    }
}
