// src/db/cancellation_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::unique_violation, error::AppError},
    models::{
        cancellation::CancellationRequest,
        review::ReviewStatus,
        submission::{Progress, Submission},
    },
};

#[derive(Clone, Default)]
pub struct CancellationRepository;

impl CancellationRepository {
    pub fn new() -> Self {
        Self
    }

    /// Grava o pedido com a fotografia do progresso da campanha.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        submission: &Submission,
        reason: Option<&str>,
        progress: &Progress,
        calculated_refund: i64,
    ) -> Result<CancellationRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, CancellationRequest>(
            r#"
            INSERT INTO cancellation_requests (
                client_id, submission_type, submission_id, reason,
                total_count, completed_count, progress_rate, total_points,
                calculated_refund, previous_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(submission.client_id)
        .bind(submission.product_type)
        .bind(submission.id)
        .bind(reason)
        .bind(progress.total_count)
        .bind(progress.completed_count)
        .bind(progress.progress_rate)
        .bind(submission.total_points)
        .bind(calculated_refund)
        .bind(submission.status)
        .fetch_one(executor)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some("idx_cancellation_requests_one_pending") => {
                AppError::InvalidState("a cancellation request is already pending".into())
            }
            _ => e.into(),
        })?;

        Ok(request)
    }

    pub async fn find_pending_for_submission<'e, E>(
        &self,
        executor: E,
        submission_id: Uuid,
    ) -> Result<Option<CancellationRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, CancellationRequest>(
            "SELECT * FROM cancellation_requests WHERE submission_id = $1 AND status = 'pending'",
        )
        .bind(submission_id)
        .fetch_optional(executor)
        .await?;

        Ok(request)
    }

    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<CancellationRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, CancellationRequest>(
            "SELECT * FROM cancellation_requests WHERE id = $1 FOR UPDATE",
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
        final_refund: Option<i64>,
        admin_response: Option<&str>,
    ) -> Result<CancellationRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, CancellationRequest>(
            r#"
            UPDATE cancellation_requests
            SET status = $2, reviewed_by = $3, final_refund = $4,
                admin_response = $5, reviewed_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(reviewed_by)
        .bind(final_refund)
        .bind(admin_response)
        .fetch_optional(executor)
        .await?;

        request.ok_or(AppError::AlreadyProcessed)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        client_id: Option<Uuid>,
        status: Option<ReviewStatus>,
    ) -> Result<Vec<CancellationRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let requests = sqlx::query_as::<_, CancellationRequest>(
            r#"
            SELECT * FROM cancellation_requests
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

