// src/models/points.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    ChargeApproval,  // Crédito por recarga aprovada
    SubmissionDebit, // Débito do custo de uma campanha
    Refund,          // Crédito de reembolso por cancelamento
    AdminAdjustment, // Ajuste manual (positivo ou negativo)
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::ChargeApproval => "Recarga",
            TransactionKind::SubmissionDebit => "Campanha",
            TransactionKind::Refund => "Reembolso",
            TransactionKind::AdminAdjustment => "Ajuste",
        }
    }
}

// --- Structs ---

// Lançamento do livro-razão. Imutável depois de inserido.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointTransaction {
    pub id: Uuid,
    pub client_id: Uuid,

    #[schema(example = -30000)]
    pub amount: i64,

    pub kind: TransactionKind,

    // Submission, ChargeRequest ou CancellationRequest de origem
    pub reference_id: Option<Uuid>,

    #[schema(example = 120000)]
    pub balance_after: i64,

    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Um lançamento a ser gravado pelo LedgerService.
#[derive(Debug, Clone)]
pub struct NewPosting {
    pub client_id: Uuid,
    pub amount: i64,
    pub kind: TransactionKind,
    pub reference_id: Option<Uuid>,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Calcula o saldo resultante de um lançamento.
/// Nunca deixa o saldo negativo e recusa lançamentos zerados.
pub fn apply_delta(balance: i64, amount: i64) -> Result<i64, AppError> {
    if amount == 0 {
        return Err(AppError::InvalidInput("amount must be non-zero".into()));
    }

    let next = balance
        .checked_add(amount)
        .ok_or_else(|| AppError::InvalidInput("amount out of range".into()))?;

    if next < 0 {
        return Err(AppError::InsufficientBalance {
            balance,
            required: -amount,
        });
    }

    Ok(next)
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustPointsPayload {
    pub client_id: Uuid,

    // Positivo = crédito, negativo = débito
    #[validate(range(min = -100_000_000, max = 100_000_000, message = "Valor fora do intervalo permitido."))]
    #[schema(example = 5000)]
    pub amount: i64,

    #[validate(length(min = 1, message = "Informe o motivo do ajuste."))]
    pub description: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TransactionQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TransactionQuery {
    pub fn page(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(50).clamp(1, 500);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

// Período do extrato em PDF
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatementQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debit_down_to_zero_is_allowed() {
        assert_eq!(apply_delta(1000, -1000).unwrap(), 0);
    }

    #[test]
    fn debit_below_zero_is_rejected_with_the_shortfall() {
        match apply_delta(0, -1) {
            Err(AppError::InsufficientBalance { balance, required }) => {
                assert_eq!(balance, 0);
                assert_eq!(required, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn zero_amount_is_a_validation_error() {
        assert!(matches!(apply_delta(10, 0), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn balance_never_goes_negative_and_matches_the_accepted_sum() {
        let postings = [500, -200, -400, 1000, -1300, -1, 250, -250, -1, 7];
        let mut balance = 0i64;
        let mut accepted = Vec::new();

        for amount in postings {
            if let Ok(next) = apply_delta(balance, amount) {
                balance = next;
                accepted.push(amount);
            }
            assert!(balance >= 0);
        }

        // Os rejeitados não deixam rastro: o saldo é a soma exata dos aceitos
        assert_eq!(balance, accepted.iter().sum::<i64>());
        assert_eq!(accepted, vec![500, -200, 1000, -1300, 250, -250, 7]);
    }

    #[test]
    fn page_is_clamped() {
        let q = TransactionQuery { limit: Some(10_000), offset: Some(-3), ..Default::default() };
        assert_eq!(q.page(), (500, 0));
        assert_eq!(TransactionQuery::default().page(), (50, 0));
    }
}
