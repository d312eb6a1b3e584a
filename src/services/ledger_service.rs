// src/services/ledger_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, PointsRepository},
    models::points::{apply_delta, AdjustPointsPayload, NewPosting, PointTransaction, TransactionKind, TransactionQuery},
};

// Único caminho de escrita em `clients.points`.
#[derive(Clone)]
pub struct LedgerService {
    client_repo: ClientRepository,
    points_repo: PointsRepository,
}

impl LedgerService {
    pub fn new(client_repo: ClientRepository, points_repo: PointsRepository) -> Self {
        Self { client_repo, points_repo }
    }

    /// Lança um crédito/débito. Trava o cliente, confere o saldo e grava
    /// lançamento + saldo na mesma transação (ou savepoint, se aninhado).
    pub async fn post<'e, E>(&self, executor: E, posting: NewPosting) -> Result<PointTransaction, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 1. Trava a linha do cliente
        let client = self
            .client_repo
            .lock_for_update(&mut *tx, posting.client_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("client".into()))?;

        // 2. Saldo nunca fica negativo
        let balance_after = apply_delta(client.points, posting.amount)?;

        // 3. Lançamento + cache do saldo
        let entry = self.points_repo.insert(&mut *tx, &posting, balance_after).await?;
        self.client_repo.set_points(&mut *tx, client.id, balance_after).await?;

        tx.commit().await?;

        tracing::info!(
            client_id = %entry.client_id,
            kind = ?entry.kind,
            amount = entry.amount,
            balance_after = entry.balance_after,
            "Lançamento de pontos registrado"
        );

        Ok(entry)
    }

    /// Ajuste manual do admin. Correções são sempre novos lançamentos.
    pub async fn adjust<'e, E>(
        &self,
        executor: E,
        admin_id: Uuid,
        payload: &AdjustPointsPayload,
    ) -> Result<PointTransaction, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        self.post(
            executor,
            NewPosting {
                client_id: payload.client_id,
                amount: payload.amount,
                kind: TransactionKind::AdminAdjustment,
                reference_id: None,
                description: Some(payload.description.clone()),
                created_by: Some(admin_id),
            },
        )
        .await
    }

    pub async fn history<'e, E>(
        &self,
        executor: E,
        client_id: Option<Uuid>,
        query: &TransactionQuery,
    ) -> Result<Vec<PointTransaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (limit, offset) = query.page();
        self.points_repo
            .list(executor, client_id, query.from, query.to, limit, offset)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    use crate::models::client::Client;

    async fn seed_client(pool: &PgPool) -> Client {
        ClientRepository::new()
            .create(pool, "ACME", None, None, None)
            .await
            .unwrap()
    }

    fn service() -> LedgerService {
        LedgerService::new(ClientRepository::new(), PointsRepository::new())
    }

    fn posting(client_id: Uuid, amount: i64) -> NewPosting {
        NewPosting {
            client_id,
            amount,
            kind: TransactionKind::AdminAdjustment,
            reference_id: None,
            description: None,
            created_by: None,
        }
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn balance_is_the_sum_of_the_ledger(pool: PgPool) {
        let client = seed_client(&pool).await;
        let ledger = service();

        for amount in [1000, -300, -800, 50] {
            let _ = ledger.post(&pool, posting(client.id, amount)).await;
        }

        let stored = ClientRepository::new().find_by_id(&pool, client.id).await.unwrap().unwrap();
        let sum = PointsRepository::new().sum_for_client(&pool, client.id).await.unwrap();

        // -800 foi recusado
        assert_eq!(stored.points, 750);
        assert_eq!(stored.points, sum);
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn spending_everything_then_one_more_point_fails(pool: PgPool) {
        let client = seed_client(&pool).await;
        let ledger = service();

        ledger.post(&pool, posting(client.id, 1000)).await.unwrap();
        let entry = ledger.post(&pool, posting(client.id, -1000)).await.unwrap();
        assert_eq!(entry.balance_after, 0);

        let result = ledger.post(&pool, posting(client.id, -1)).await;
        assert!(matches!(result, Err(AppError::InsufficientBalance { balance: 0, required: 1 })));

        let history = ledger
            .history(&pool, Some(client.id), &TransactionQuery::default())
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
    }
}
