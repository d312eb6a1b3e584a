// src/models/charge.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::review::ReviewStatus;

// Pedido de recarga de pontos feito pela empresa cliente
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
    pub id: Uuid,
    pub client_id: Uuid,

    #[schema(example = 300000)]
    pub amount: i64,

    // Nome de quem fez o depósito, para conferência no extrato bancário
    pub depositor_name: Option<String>,

    pub status: ReviewStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,

    // Só preenchido quando rejeitado
    pub rejection_reason: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateChargeRequestPayload {
    #[validate(range(min = 1, max = 100_000_000, message = "O valor deve ser um inteiro positivo."))]
    #[schema(example = 300000)]
    pub amount: i64,

    pub depositor_name: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectChargeRequestPayload {
    #[schema(example = "Depósito não identificado")]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewListQuery {
    pub status: Option<ReviewStatus>,
}
