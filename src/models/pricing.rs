// src/models/pricing.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Preço por unidade negociado com cada cliente, por categoria
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPrice {
    pub client_id: Uuid,

    // Tipo de produto, "blog_auto" ou slug de categoria dinâmica
    #[schema(example = "place")]
    pub category_slug: String,

    #[schema(example = 30)]
    pub price_per_unit: i64,

    pub is_visible: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPricePayload {
    #[validate(length(min = 1, max = 64, message = "Categoria inválida."))]
    #[schema(example = "receipt")]
    pub category_slug: String,

    #[validate(range(min = 1, max = 100_000_000, message = "O preço deve ser positivo."))]
    #[schema(example = 1200)]
    pub price_per_unit: i64,

    pub is_visible: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPricesPayload {
    #[validate(length(min = 1), nested)]
    pub prices: Vec<SetPricePayload>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prices(body: serde_json::Value) -> SetPricesPayload {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn each_price_in_the_list_is_validated() {
        let ok = prices(json!({ "prices": [{ "categorySlug": "receipt", "pricePerUnit": 1200 }] }));
        assert!(ok.validate().is_ok());

        let zero = prices(json!({ "prices": [
            { "categorySlug": "receipt", "pricePerUnit": 1200 },
            { "categorySlug": "place", "pricePerUnit": 0 }
        ] }));
        assert!(zero.validate().is_err());

        let empty = prices(json!({ "prices": [] }));
        assert!(empty.validate().is_err());
    }
}
