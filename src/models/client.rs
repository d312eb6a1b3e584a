// src/models/client.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// Client (a empresa contratante)
// ---
// `points` é o cache do saldo do livro-razão. Só o LedgerService escreve nele.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,

    #[schema(example = "ACME 주식회사")]
    pub company_name: String,

    #[schema(example = "123-45-67890")]
    pub business_number: Option<String>,

    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,

    #[schema(example = 150000)]
    pub points: i64,

    pub pending_charge_requests_count: i32,

    // Libera o preço de distribuição automática de blog
    pub auto_distribution_approved: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetAutoDistributionPayload {
    pub approved: bool,
}
