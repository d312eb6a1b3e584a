// src/db/submission_repo.rs

use chrono::NaiveDate;
use sqlx::{types::Json, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::unique_violation, error::AppError},
    models::submission::{
        ContentItem, DailyRecord, ProductType, ProgressSource, Submission, SubmissionPayload,
        SubmissionStatus,
    },
};

#[derive(Clone, Default)]
pub struct SubmissionRepository;

impl SubmissionRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  SUBMISSIONS
    // =========================================================================

    pub async fn create<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        payload: &SubmissionPayload,
        total_count: i64,
        unit_price: i64,
        total_points: i64,
        start_date: Option<NaiveDate>,
        idempotency_key: Option<&str>,
    ) -> Result<Submission, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (
                client_id, product_type, payload, total_count, unit_price, total_points,
                start_date, idempotency_key
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(payload.product_type())
        .bind(Json(payload))
        .bind(total_count)
        .bind(unit_price)
        .bind(total_points)
        .bind(start_date)
        .bind(idempotency_key)
        .fetch_one(executor)
        .await
        .map_err(|e| match unique_violation(&e) {
            // Outra requisição com a mesma chave ganhou a corrida
            Some("idx_submissions_idempotency") => {
                AppError::InvalidState("idempotency key already in use".into())
            }
            _ => e.into(),
        })?;

        Ok(submission)
    }

    pub async fn find_by_idempotency_key<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        key: &str,
    ) -> Result<Option<Submission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let submission = sqlx::query_as::<_, Submission>(
            "SELECT * FROM submissions WHERE client_id = $1 AND idempotency_key = $2",
        )
        .bind(client_id)
        .bind(key)
        .fetch_optional(executor)
        .await?;

        Ok(submission)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Submission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let submission = sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(submission)
    }

    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Submission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let submission = sqlx::query_as::<_, Submission>(
            "SELECT * FROM submissions WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(submission)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: SubmissionStatus,
    ) -> Result<Submission, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(submission)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        client_id: Option<Uuid>,
        status: Option<SubmissionStatus>,
        product_type: Option<ProductType>,
    ) -> Result<Vec<Submission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT * FROM submissions
            WHERE ($1::uuid IS NULL OR client_id = $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR product_type = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(client_id)
        .bind(status)
        .bind(product_type)
        .fetch_all(executor)
        .await?;

        Ok(submissions)
    }

    // =========================================================================
    //  PROGRESSO
    // =========================================================================

    /// Upsert: o último registro do dia vence.
    pub async fn upsert_daily_record<'e, E>(
        &self,
        executor: E,
        submission_id: Uuid,
        record_date: NaiveDate,
        actual_count: i64,
        notes: Option<&str>,
    ) -> Result<DailyRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, DailyRecord>(
            r#"
            INSERT INTO daily_records (submission_id, record_date, actual_count, notes)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (submission_id, record_date) DO UPDATE
            SET actual_count = EXCLUDED.actual_count,
                notes = EXCLUDED.notes,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(submission_id)
        .bind(record_date)
        .bind(actual_count)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    pub async fn list_daily_records<'e, E>(
        &self,
        executor: E,
        submission_id: Uuid,
    ) -> Result<Vec<DailyRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = sqlx::query_as::<_, DailyRecord>(
            "SELECT * FROM daily_records WHERE submission_id = $1 ORDER BY record_date ASC",
        )
        .bind(submission_id)
        .fetch_all(executor)
        .await?;

        Ok(records)
    }

    pub async fn add_content_item<'e, E>(
        &self,
        executor: E,
        submission_id: Uuid,
        url: &str,
        title: Option<&str>,
        published_at: Option<NaiveDate>,
    ) -> Result<ContentItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, ContentItem>(
            r#"
            INSERT INTO content_items (submission_id, url, title, published_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(submission_id)
        .bind(url)
        .bind(title)
        .bind(published_at)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn list_content_items<'e, E>(
        &self,
        executor: E,
        submission_id: Uuid,
    ) -> Result<Vec<ContentItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, ContentItem>(
            "SELECT * FROM content_items WHERE submission_id = $1 ORDER BY created_at ASC",
        )
        .bind(submission_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    /// Quantidade concluída: soma dos registros diários ou número de conteúdos publicados.
    pub async fn completed_count<'e, E>(
        &self,
        executor: E,
        submission_id: Uuid,
        source: ProgressSource,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = match source {
            ProgressSource::DailyRecords => {
                "SELECT COALESCE(SUM(actual_count), 0)::BIGINT FROM daily_records WHERE submission_id = $1"
            }
            ProgressSource::ContentItems => {
                "SELECT COUNT(*)::BIGINT FROM content_items WHERE submission_id = $1"
            }
        };

        let completed = sqlx::query_scalar::<_, i64>(sql)
            .bind(submission_id)
            .fetch_one(executor)
            .await?;

        Ok(completed)
    }
}
