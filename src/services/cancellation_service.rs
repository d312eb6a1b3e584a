// src/services/cancellation_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CancellationRepository, SubmissionRepository},
    models::{
        cancellation::{calculate_refund, CancellationRequest, CreateCancellationPayload, ProcessCancellationPayload},
        points::{NewPosting, TransactionKind},
        review::{Decision, ReviewStatus},
        submission::SubmissionStatus,
    },
    services::{ledger_service::LedgerService, submission_service::SubmissionService},
};

#[derive(Clone)]
pub struct CancellationService {
    repo: CancellationRepository,
    submission_repo: SubmissionRepository,
    submissions: SubmissionService,
    ledger: LedgerService,
}

impl CancellationService {
    pub fn new(
        repo: CancellationRepository,
        submission_repo: SubmissionRepository,
        submissions: SubmissionService,
        ledger: LedgerService,
    ) -> Self {
        Self { repo, submission_repo, submissions, ledger }
    }

    /// Pede o cancelamento: fotografa o progresso, calcula o reembolso
    /// e coloca a campanha em `cancellation_requested`.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        payload: &CreateCancellationPayload,
    ) -> Result<CancellationRequest, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 1. A campanha precisa existir e ser do cliente
        let submission = self
            .submission_repo
            .find_for_update(&mut *tx, payload.submission_id)
            .await?
            .filter(|s| s.client_id == client_id)
            .ok_or_else(|| AppError::ResourceNotFound("submission".into()))?;

        if submission.product_type != payload.submission_type {
            return Err(AppError::InvalidInput(format!(
                "submission is '{}', not '{}'",
                submission.product_type.as_str(),
                payload.submission_type.as_str()
            )));
        }

        // 2. Estado atual permite cancelar?
        let next = submission.status.transition(SubmissionStatus::CancellationRequested)?;

        if self
            .repo
            .find_pending_for_submission(&mut *tx, submission.id)
            .await?
            .is_some()
        {
            return Err(AppError::InvalidState("a cancellation request is already pending".into()));
        }

        // 3. Snapshot + reembolso
        let progress = self.submissions.progress(&mut *tx, &submission).await?;
        let calculated_refund = calculate_refund(submission.total_points, &progress);

        let request = self
            .repo
            .create(&mut *tx, &submission, payload.reason.as_deref(), &progress, calculated_refund)
            .await?;

        self.submission_repo.update_status(&mut *tx, submission.id, next).await?;

        tx.commit().await?;

        tracing::info!(
            cancellation_id = %request.id,
            submission_id = %submission.id,
            calculated_refund,
            "Cancelamento solicitado"
        );
        Ok(request)
    }

    /// Decisão do admin. Aprovado: reembolso + `cancelled`.
    /// Rejeitado: a campanha volta ao status anterior.
    pub async fn process<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        admin_id: Uuid,
        payload: &ProcessCancellationPayload,
    ) -> Result<CancellationRequest, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let request = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("cancellation request".into()))?;
        request.status.ensure_pending()?;

        let submission = self
            .submission_repo
            .find_for_update(&mut *tx, request.submission_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("submission".into()))?;

        let processed = match payload.status {
            Decision::Approved => {
                let refund = match payload.final_refund {
                    Some(value) if !(0..=request.total_points).contains(&value) => {
                        return Err(AppError::InvalidInput(format!(
                            "finalRefund must be between 0 and {}",
                            request.total_points
                        )));
                    }
                    Some(value) => value,
                    None => request.calculated_refund,
                };

                let next = submission.status.transition(SubmissionStatus::Cancelled)?;
                self.submission_repo.update_status(&mut *tx, submission.id, next).await?;

                if refund > 0 {
                    self.ledger
                        .post(
                            &mut *tx,
                            NewPosting {
                                client_id: request.client_id,
                                amount: refund,
                                kind: TransactionKind::Refund,
                                reference_id: Some(request.id),
                                description: Some(format!("Cancelamento {}", submission.id)),
                                created_by: Some(admin_id),
                            },
                        )
                        .await?;
                }

                self.repo
                    .mark_reviewed(
                        &mut *tx,
                        id,
                        ReviewStatus::Approved,
                        admin_id,
                        Some(refund),
                        payload.admin_response.as_deref(),
                    )
                    .await?
            }
            Decision::Rejected => {
                let next = submission.status.transition(request.previous_status)?;
                self.submission_repo.update_status(&mut *tx, submission.id, next).await?;

                self.repo
                    .mark_reviewed(
                        &mut *tx,
                        id,
                        ReviewStatus::Rejected,
                        admin_id,
                        None,
                        payload.admin_response.as_deref(),
                    )
                    .await?
            }
        };

        tx.commit().await?;

        tracing::info!(
            cancellation_id = %id,
            status = ?processed.status,
            refund = processed.final_refund,
            "Cancelamento processado"
        );
        Ok(processed)
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
        self.repo.list(executor, client_id, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde_json::json;
    use sqlx::PgPool;

    use crate::{
        db::{CategoryRepository, ClientRepository, PointsRepository, PricingRepository, UserRepository},
        models::{
            auth::Role,
            submission::{CreateSubmissionRequest, ProductType, Submission, UpsertDailyRecordPayload},
        },
        services::{category_service::CategoryService, pricing_service::PricingService},
    };

    struct Fixture {
        client_id: Uuid,
        admin_id: Uuid,
        submissions: SubmissionService,
        cancellations: CancellationService,
    }

    async fn fixture(pool: &PgPool) -> Fixture {
        let ledger = LedgerService::new(ClientRepository::new(), PointsRepository::new());
        let submissions = SubmissionService::new(
            SubmissionRepository::new(),
            ClientRepository::new(),
            PricingService::new(PricingRepository::new(), ClientRepository::new()),
            CategoryService::new(CategoryRepository::new()),
            ledger.clone(),
        );
        let cancellations = CancellationService::new(
            CancellationRepository::new(),
            SubmissionRepository::new(),
            submissions.clone(),
            ledger.clone(),
        );

        let client = ClientRepository::new().create(pool, "ACME", None, None, None).await.unwrap();
        let admin = UserRepository::new(pool.clone())
            .create_user(pool, "admin@acme.test", "x", Role::Admin, None)
            .await
            .unwrap();
        PricingRepository::new().upsert(pool, client.id, "kakaomap", 10, true).await.unwrap();
        ledger
            .post(
                pool,
                NewPosting {
                    client_id: client.id,
                    amount: 1000,
                    kind: TransactionKind::AdminAdjustment,
                    reference_id: None,
                    description: None,
                    created_by: Some(admin.id),
                },
            )
            .await
            .unwrap();

        Fixture { client_id: client.id, admin_id: admin.id, submissions, cancellations }
    }

    /// 100 unidades × 10 pontos = 1000 pontos, com 30 unidades executadas.
    async fn campaign_at_thirty_percent(pool: &PgPool, f: &Fixture) -> Submission {
        let request: CreateSubmissionRequest = serde_json::from_value(json!({
            "placeUrl": "https://place.map.kakao.com/1",
            "dailyCount": 10,
            "totalCount": 100
        }))
        .unwrap();

        let (submission, _) = f
            .submissions
            .create(pool, f.client_id, f.admin_id, ProductType::Kakaomap, request, None)
            .await
            .unwrap();
        f.submissions
            .update_status(pool, submission.id, SubmissionStatus::InProgress)
            .await
            .unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let record = UpsertDailyRecordPayload { date, actual_count: 30, notes: None };
        f.submissions.record_daily_progress(pool, submission.id, &record).await.unwrap();

        submission
    }

    fn cancel(submission: &Submission) -> CreateCancellationPayload {
        CreateCancellationPayload {
            submission_type: submission.product_type,
            submission_id: submission.id,
            reason: Some("budget cut".into()),
        }
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn approved_cancellation_refunds_the_unfinished_part(pool: PgPool) {
        let f = fixture(&pool).await;
        let submission = campaign_at_thirty_percent(&pool, &f).await;

        let request = f.cancellations.create(&pool, f.client_id, &cancel(&submission)).await.unwrap();
        assert_eq!(request.progress_rate, Decimal::new(3, 1));
        assert_eq!(request.calculated_refund, 700);

        let decision = ProcessCancellationPayload { status: Decision::Approved, final_refund: None, admin_response: None };
        let processed = f.cancellations.process(&pool, request.id, f.admin_id, &decision).await.unwrap();
        assert_eq!(processed.final_refund, Some(700));

        let client = ClientRepository::new().find_by_id(&pool, f.client_id).await.unwrap().unwrap();
        assert_eq!(client.points, 700);

        let detail = f.submissions.get(&pool, submission.id, None).await.unwrap();
        assert_eq!(detail.submission.status, SubmissionStatus::Cancelled);

        // Segunda decisão é recusada
        let again = f.cancellations.process(&pool, request.id, f.admin_id, &decision).await;
        assert!(matches!(again, Err(AppError::AlreadyProcessed)));
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn rejected_cancellation_restores_the_previous_status(pool: PgPool) {
        let f = fixture(&pool).await;
        let submission = campaign_at_thirty_percent(&pool, &f).await;

        let request = f.cancellations.create(&pool, f.client_id, &cancel(&submission)).await.unwrap();

        // Só um pedido pendente por campanha
        let duplicate = f.cancellations.create(&pool, f.client_id, &cancel(&submission)).await;
        assert!(matches!(duplicate, Err(AppError::InvalidState(_))));

        let decision = ProcessCancellationPayload {
            status: Decision::Rejected,
            final_refund: None,
            admin_response: Some("Campanha quase concluída".into()),
        };
        f.cancellations.process(&pool, request.id, f.admin_id, &decision).await.unwrap();

        let detail = f.submissions.get(&pool, submission.id, None).await.unwrap();
        assert_eq!(detail.submission.status, SubmissionStatus::InProgress);

        let client = ClientRepository::new().find_by_id(&pool, f.client_id).await.unwrap().unwrap();
        assert_eq!(client.points, 0);
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn refund_override_cannot_exceed_what_was_paid(pool: PgPool) {
        let f = fixture(&pool).await;
        let submission = campaign_at_thirty_percent(&pool, &f).await;
        let request = f.cancellations.create(&pool, f.client_id, &cancel(&submission)).await.unwrap();

        let decision = ProcessCancellationPayload {
            status: Decision::Approved,
            final_refund: Some(1001),
            admin_response: None,
        };
        let result = f.cancellations.process(&pool, request.id, f.admin_id, &decision).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
