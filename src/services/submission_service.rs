// src/services/submission_service.rs

use serde_json::Value;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, SubmissionRepository},
    models::{
        points::{NewPosting, TransactionKind},
        submission::{
            compute_total_points, AddContentItemPayload, ContentItem, CreateSubmissionRequest,
            DailyRecord, ProductType, Progress, Submission, SubmissionDetail, SubmissionListQuery,
            SubmissionPayload, SubmissionStatus, UpsertDailyRecordPayload,
        },
    },
    services::{category_service::CategoryService, ledger_service::LedgerService, pricing_service::PricingService},
};

/// Uma campanha só é visível para o dono ou para o admin (`scope = None`).
fn ensure_visible(submission: &Submission, scope: Option<Uuid>) -> Result<(), AppError> {
    match scope {
        Some(client_id) if client_id != submission.client_id => {
            Err(AppError::ResourceNotFound("submission".into()))
        }
        _ => Ok(()),
    }
}

#[derive(Clone)]
pub struct SubmissionService {
    repo: SubmissionRepository,
    client_repo: ClientRepository,
    pricing: PricingService,
    categories: CategoryService,
    ledger: LedgerService,
}

impl SubmissionService {
    pub fn new(
        repo: SubmissionRepository,
        client_repo: ClientRepository,
        pricing: PricingService,
        categories: CategoryService,
        ledger: LedgerService,
    ) -> Self {
        Self { repo, client_repo, pricing, categories, ledger }
    }

    // =========================================================================
    //  CRIAÇÃO (débito + pedido na mesma transação)
    // =========================================================================

    /// Devolve a campanha e se ela foi criada agora (`false` = repetição idempotente).
    pub async fn create<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        user_id: Uuid,
        product_type: ProductType,
        request: CreateSubmissionRequest,
        idempotency_key: Option<&str>,
    ) -> Result<(Submission, bool), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let payload = SubmissionPayload::parse(product_type, Value::Object(request.fields))?;

        let mut tx = executor.begin().await?;

        // 1. Repetição com a mesma chave devolve o pedido original, sem novo débito
        if let Some(key) = idempotency_key {
            if let Some(existing) = self.repo.find_by_idempotency_key(&mut *tx, client_id, key).await? {
                tracing::info!(submission_id = %existing.id, "Pedido repetido (Idempotency-Key)");
                return Ok((existing, false));
            }
        }

        // 2. Regras do cliente. Trava a linha antes de qualquer insert que a referencie
        let client = self
            .client_repo
            .lock_for_update(&mut *tx, client_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("client".into()))?;

        if payload.requires_auto_distribution() && !client.auto_distribution_approved {
            return Err(AppError::Forbidden);
        }

        // 3. Quantidade (categorias dinâmicas validam contra o esquema)
        let dynamic_quantity = match &payload {
            SubmissionPayload::Dynamic(dynamic) => {
                let category = self.categories.find_active(&mut *tx, &dynamic.category).await?;
                Some(category.validate_form_data(&dynamic.form_data)?)
            }
            _ => None,
        };
        let total_count = payload.total_count(dynamic_quantity)?;

        // 4. Preço e custo
        let price_category = payload.price_category();
        let unit_price = self.pricing.resolve(&mut *tx, client_id, &price_category).await?;
        let total_points = compute_total_points(unit_price, total_count)?;

        // 5. Grava e debita
        let submission = self
            .repo
            .create(
                &mut *tx,
                client_id,
                &payload,
                total_count,
                unit_price,
                total_points,
                request.start_date,
                idempotency_key,
            )
            .await?;

        self.ledger
            .post(
                &mut *tx,
                NewPosting {
                    client_id,
                    amount: -total_points,
                    kind: TransactionKind::SubmissionDebit,
                    reference_id: Some(submission.id),
                    description: Some(format!("{} × {}", price_category, total_count)),
                    created_by: Some(user_id),
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            submission_id = %submission.id,
            product_type = product_type.as_str(),
            total_points,
            "Campanha criada"
        );

        Ok((submission, true))
    }

    // =========================================================================
    //  STATUS
    // =========================================================================

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        next: SubmissionStatus,
    ) -> Result<Submission, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let submission = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("submission".into()))?;

        let next = submission.status.admin_transition(next)?;
        let updated = self.repo.update_status(&mut *tx, id, next).await?;

        tx.commit().await?;

        tracing::info!(
            submission_id = %id,
            from = submission.status.as_str(),
            to = next.as_str(),
            "Status da campanha alterado"
        );
        Ok(updated)
    }

    // =========================================================================
    //  PROGRESSO
    // =========================================================================

    pub async fn progress<'e, E>(&self, executor: E, submission: &Submission) -> Result<Progress, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let completed = self
            .repo
            .completed_count(executor, submission.id, submission.product_type.progress_source())
            .await?;

        Ok(Progress::new(submission.total_count, completed))
    }

    /// Registro diário: upsert por (campanha, dia). Não mexe no status.
    pub async fn record_daily_progress<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpsertDailyRecordPayload,
    ) -> Result<DailyRecord, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("submission".into()))?;

        let record = self
            .repo
            .upsert_daily_record(&mut *tx, id, payload.date, payload.actual_count, payload.notes.as_deref())
            .await?;

        tx.commit().await?;
        Ok(record)
    }

    pub async fn list_daily_records<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        scope: Option<Uuid>,
    ) -> Result<Vec<DailyRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let submission = self.find_visible(&mut *tx, id, scope).await?;
        let records = self.repo.list_daily_records(&mut *tx, submission.id).await?;

        tx.commit().await?;
        Ok(records)
    }

    pub async fn add_content_item<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &AddContentItemPayload,
    ) -> Result<ContentItem, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("submission".into()))?;

        let item = self
            .repo
            .add_content_item(&mut *tx, id, &payload.url, payload.title.as_deref(), payload.published_at)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn list_content_items<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        scope: Option<Uuid>,
    ) -> Result<Vec<ContentItem>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let submission = self.find_visible(&mut *tx, id, scope).await?;
        let items = self.repo.list_content_items(&mut *tx, submission.id).await?;

        tx.commit().await?;
        Ok(items)
    }

    // =========================================================================
    //  CONSULTAS
    // =========================================================================

    async fn find_visible<'e, E>(&self, executor: E, id: Uuid, scope: Option<Uuid>) -> Result<Submission, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let submission = self
            .repo
            .find_by_id(executor, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("submission".into()))?;

        ensure_visible(&submission, scope)?;
        Ok(submission)
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid, scope: Option<Uuid>) -> Result<SubmissionDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let submission = self.find_visible(&mut *tx, id, scope).await?;
        let progress = self.progress(&mut *tx, &submission).await?;

        tx.commit().await?;
        Ok(SubmissionDetail { submission, progress })
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        query: &SubmissionListQuery,
    ) -> Result<Vec<Submission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor, scope, query.status, query.product_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::PgPool;

    use crate::{
        db::{CategoryRepository, PointsRepository, PricingRepository, UserRepository},
        models::auth::Role,
    };

    fn service() -> SubmissionService {
        let ledger = LedgerService::new(ClientRepository::new(), PointsRepository::new());
        SubmissionService::new(
            SubmissionRepository::new(),
            ClientRepository::new(),
            PricingService::new(PricingRepository::new(), ClientRepository::new()),
            CategoryService::new(CategoryRepository::new()),
            ledger,
        )
    }

    fn receipt(total_count: i64) -> CreateSubmissionRequest {
        let body = json!({
            "placeUrl": "https://m.place.naver.com/restaurant/1",
            "businessName": "Bakery",
            "dailyCount": 1,
            "totalCount": total_count
        });
        serde_json::from_value(body).unwrap()
    }

    /// Cliente com 1000 pontos e recibo a 1 ponto por unidade.
    async fn seed(pool: &PgPool) -> (Uuid, Uuid) {
        let clients = ClientRepository::new();
        let client = clients.create(pool, "ACME", None, None, None).await.unwrap();
        let user = UserRepository::new(pool.clone())
            .create_user(pool, "ops@acme.test", "x", Role::Client, Some(client.id))
            .await
            .unwrap();

        PricingRepository::new().upsert(pool, client.id, "receipt", 1, true).await.unwrap();

        LedgerService::new(ClientRepository::new(), PointsRepository::new())
            .post(
                pool,
                NewPosting {
                    client_id: client.id,
                    amount: 1000,
                    kind: TransactionKind::AdminAdjustment,
                    reference_id: None,
                    description: None,
                    created_by: None,
                },
            )
            .await
            .unwrap();

        (client.id, user.id)
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn spending_the_whole_balance_then_one_more(pool: PgPool) {
        let (client_id, user_id) = seed(&pool).await;
        let submissions = service();

        let (first, created) = submissions
            .create(&pool, client_id, user_id, ProductType::Receipt, receipt(1000), None)
            .await
            .unwrap();
        assert!(created);
        assert_eq!(first.total_points, 1000);

        let result = submissions
            .create(&pool, client_id, user_id, ProductType::Receipt, receipt(1), None)
            .await;
        assert!(matches!(result, Err(AppError::InsufficientBalance { balance: 0, required: 1 })));

        // O pedido recusado não deixou nada para trás
        let all = submissions
            .list(&pool, Some(client_id), &SubmissionListQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn same_idempotency_key_debits_once(pool: PgPool) {
        let (client_id, user_id) = seed(&pool).await;
        let submissions = service();

        let (a, _) = submissions
            .create(&pool, client_id, user_id, ProductType::Receipt, receipt(100), Some("k-1"))
            .await
            .unwrap();
        let (b, created) = submissions
            .create(&pool, client_id, user_id, ProductType::Receipt, receipt(100), Some("k-1"))
            .await
            .unwrap();

        assert_eq!(a.id, b.id);
        assert!(!created);

        let client = ClientRepository::new().find_by_id(&pool, client_id).await.unwrap().unwrap();
        assert_eq!(client.points, 900);
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn products_without_a_price_are_refused(pool: PgPool) {
        let (client_id, user_id) = seed(&pool).await;
        let body = json!({
            "targetUrl": "https://cafe.naver.com/x",
            "cafeNames": ["mom cafe"],
            "totalCount": 3
        });
        let request: CreateSubmissionRequest = serde_json::from_value(body).unwrap();

        let result = service()
            .create(&pool, client_id, user_id, ProductType::Cafe, request, None)
            .await;
        assert!(matches!(result, Err(AppError::NoPriceConfigured(slug)) if slug == "cafe"));
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn daily_record_upsert_keeps_one_row_per_day(pool: PgPool) {
        let (client_id, user_id) = seed(&pool).await;
        let submissions = service();
        let (submission, _) = submissions
            .create(&pool, client_id, user_id, ProductType::Receipt, receipt(100), None)
            .await
            .unwrap();

        let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        for count in [10, 30, 30] {
            let payload = UpsertDailyRecordPayload { date, actual_count: count, notes: None };
            submissions.record_daily_progress(&pool, submission.id, &payload).await.unwrap();
        }

        let records = submissions.list_daily_records(&pool, submission.id, None).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].actual_count, 30);

        let detail = submissions.get(&pool, submission.id, Some(client_id)).await.unwrap();
        assert_eq!(detail.progress.completed_count, 30);
        assert_eq!(detail.submission.status, SubmissionStatus::Pending);

        // Outro cliente não enxerga a campanha
        let other = submissions.get(&pool, submission.id, Some(Uuid::new_v4())).await;
        assert!(matches!(other, Err(AppError::ResourceNotFound(_))));
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn parallel_creates_never_overdraw(pool: PgPool) {
        let (client_id, user_id) = seed(&pool).await;
        let submissions = service();

        let mut handles = Vec::new();
        for _ in 0..6 {
            let pool = pool.clone();
            let submissions = submissions.clone();
            handles.push(tokio::spawn(async move {
                submissions
                    .create(&pool, client_id, user_id, ProductType::Receipt, receipt(300), None)
                    .await
            }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::InsufficientBalance { .. }) => {}
                Err(other) => panic!("erro inesperado: {other:?}"),
            }
        }
        assert_eq!(created, 3);

        let client = ClientRepository::new().find_by_id(&pool, client_id).await.unwrap().unwrap();
        let ledger_sum = PointsRepository::new().sum_for_client(&pool, client_id).await.unwrap();
        assert_eq!(client.points, 100);
        assert_eq!(client.points, ledger_sum);
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn works_over_a_pooled_connection(pool: PgPool) {
        let (client_id, user_id) = seed(&pool).await;
        let submissions = service();
        let mut conn = pool.acquire().await.unwrap();

        let (submission, _) = submissions
            .create(&mut *conn, client_id, user_id, ProductType::Receipt, receipt(10), None)
            .await
            .unwrap();

        let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let payload = UpsertDailyRecordPayload { date, actual_count: 4, notes: None };
        submissions.record_daily_progress(&mut *conn, submission.id, &payload).await.unwrap();

        let item = AddContentItemPayload {
            url: "https://blog.naver.com/acme/1".into(),
            title: None,
            published_at: None,
        };
        submissions.add_content_item(&mut *conn, submission.id, &item).await.unwrap();

        let records = submissions.list_daily_records(&mut *conn, submission.id, Some(client_id)).await.unwrap();
        let items = submissions.list_content_items(&mut *conn, submission.id, Some(client_id)).await.unwrap();
        let detail = submissions.get(&mut *conn, submission.id, Some(client_id)).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(items.len(), 1);
        assert_eq!(detail.progress.completed_count, 4);
    }
}
