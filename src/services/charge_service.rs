// src/services/charge_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ChargeRepository, ClientRepository},
    models::{
        charge::{ChargeRequest, CreateChargeRequestPayload},
        points::{NewPosting, TransactionKind},
        review::ReviewStatus,
    },
    services::ledger_service::LedgerService,
};

#[derive(Clone)]
pub struct ChargeService {
    repo: ChargeRepository,
    client_repo: ClientRepository,
    ledger: LedgerService,
}

impl ChargeService {
    pub fn new(repo: ChargeRepository, client_repo: ClientRepository, ledger: LedgerService) -> Self {
        Self { repo, client_repo, ledger }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        payload: &CreateChargeRequestPayload,
    ) -> Result<ChargeRequest, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // A contagem de pendentes só é confiável com o cliente travado
        self.client_repo
            .lock_for_update(&mut *tx, client_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("client".into()))?;

        let request = self
            .repo
            .create(&mut *tx, client_id, payload.amount, payload.depositor_name.as_deref())
            .await?;

        self.client_repo.refresh_pending_charge_count(&mut *tx, client_id).await?;

        tx.commit().await?;
        Ok(request)
    }

    /// Aprova a recarga e credita os pontos. Tudo ou nada.
    pub async fn approve<'e, E>(&self, executor: E, id: Uuid, admin_id: Uuid) -> Result<ChargeRequest, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let request = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("charge request".into()))?;
        request.status.ensure_pending()?;

        let approved = self
            .repo
            .mark_reviewed(&mut *tx, id, ReviewStatus::Approved, admin_id, None)
            .await?;

        self.ledger
            .post(
                &mut *tx,
                NewPosting {
                    client_id: approved.client_id,
                    amount: approved.amount,
                    kind: TransactionKind::ChargeApproval,
                    reference_id: Some(approved.id),
                    description: approved.depositor_name.clone(),
                    created_by: Some(admin_id),
                },
            )
            .await?;

        self.client_repo.refresh_pending_charge_count(&mut *tx, approved.client_id).await?;

        tx.commit().await?;

        tracing::info!(charge_request_id = %id, amount = approved.amount, "Recarga aprovada");
        Ok(approved)
    }

    pub async fn reject<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        admin_id: Uuid,
        reason: Option<&str>,
    ) -> Result<ChargeRequest, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let request = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("charge request".into()))?;
        request.status.ensure_pending()?;

        let rejected = self
            .repo
            .mark_reviewed(&mut *tx, id, ReviewStatus::Rejected, admin_id, reason)
            .await?;

        self.client_repo.lock_for_update(&mut *tx, rejected.client_id).await?;
        self.client_repo.refresh_pending_charge_count(&mut *tx, rejected.client_id).await?;

        tx.commit().await?;

        tracing::info!(charge_request_id = %id, "Recarga rejeitada");
        Ok(rejected)
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
        self.repo.list(executor, client_id, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    use crate::{
        db::{PointsRepository, UserRepository},
        models::auth::Role,
    };

    fn service() -> ChargeService {
        let ledger = LedgerService::new(ClientRepository::new(), PointsRepository::new());
        ChargeService::new(ChargeRepository::new(), ClientRepository::new(), ledger)
    }

    async fn seed(pool: &PgPool) -> (Uuid, Uuid) {
        let client = ClientRepository::new()
            .create(pool, "ACME", None, None, None)
            .await
            .unwrap();
        let admin = UserRepository::new(pool.clone())
            .create_user(pool, "admin@example.com", "x", Role::Admin, None)
            .await
            .unwrap();
        (client.id, admin.id)
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn approval_credits_once_and_cannot_be_reversed(pool: PgPool) {
        let (client_id, admin_id) = seed(&pool).await;
        let charges = service();

        let payload = CreateChargeRequestPayload { amount: 300_000, depositor_name: Some("KIM".into()) };
        let request = charges.create(&pool, client_id, &payload).await.unwrap();

        let pending = ClientRepository::new().find_by_id(&pool, client_id).await.unwrap().unwrap();
        assert_eq!(pending.pending_charge_requests_count, 1);

        charges.approve(&pool, request.id, admin_id).await.unwrap();

        // Rejeitar um pedido aprovado não muda nada
        let result = charges.reject(&pool, request.id, admin_id, Some("late")).await;
        assert!(matches!(result, Err(AppError::AlreadyProcessed)));
        let result = charges.approve(&pool, request.id, admin_id).await;
        assert!(matches!(result, Err(AppError::AlreadyProcessed)));

        let client = ClientRepository::new().find_by_id(&pool, client_id).await.unwrap().unwrap();
        assert_eq!(client.points, 300_000);
        assert_eq!(client.pending_charge_requests_count, 0);
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn rejection_keeps_the_reason_and_the_balance(pool: PgPool) {
        let (client_id, admin_id) = seed(&pool).await;
        let charges = service();

        let payload = CreateChargeRequestPayload { amount: 5_000, depositor_name: None };
        let request = charges.create(&pool, client_id, &payload).await.unwrap();
        let rejected = charges
            .reject(&pool, request.id, admin_id, Some("Depósito não identificado"))
            .await
            .unwrap();

        assert_eq!(rejected.status, ReviewStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Depósito não identificado"));

        let client = ClientRepository::new().find_by_id(&pool, client_id).await.unwrap().unwrap();
        assert_eq!(client.points, 0);
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn pending_counter_survives_parallel_traffic(pool: PgPool) {
        let (client_id, admin_id) = seed(&pool).await;
        let charges = service();
        let payload = CreateChargeRequestPayload { amount: 1_000, depositor_name: None };

        let mut to_reject = Vec::new();
        for _ in 0..4 {
            to_reject.push(charges.create(&pool, client_id, &payload).await.unwrap().id);
        }

        let mut handles = Vec::new();
        for id in to_reject {
            let (pool, charges) = (pool.clone(), charges.clone());
            handles.push(tokio::spawn(async move {
                charges.reject(&pool, id, admin_id, None).await.map(|_| ())
            }));
        }
        for _ in 0..4 {
            let (pool, charges) = (pool.clone(), charges.clone());
            handles.push(tokio::spawn(async move {
                let payload = CreateChargeRequestPayload { amount: 2_000, depositor_name: None };
                charges.create(&pool, client_id, &payload).await.map(|_| ())
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let pending: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM charge_requests WHERE client_id = $1 AND status = 'pending'",
        )
        .bind(client_id)
        .fetch_one(&pool)
        .await
        .unwrap();

        let client = ClientRepository::new().find_by_id(&pool, client_id).await.unwrap().unwrap();
        assert_eq!(pending, 4);
        assert_eq!(i64::from(client.pending_charge_requests_count), pending);
    }
}
