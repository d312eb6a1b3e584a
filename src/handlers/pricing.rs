// src/handlers/pricing.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::get_scoped_connection,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{AdminUser, ClientUser},
    },
    models::pricing::{ClientPrice, SetPricesPayload},
};

// GET /api/pricing
#[utoipa::path(
    get,
    path = "/api/pricing",
    tag = "Pricing",
    responses(
        (status = 200, description = "Preços visíveis da empresa logada", body = Vec<ClientPrice>),
        (status = 403, description = "Apenas clientes")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_prices(
    State(app_state): State<AppState>,
    locale: Locale,
    client: ClientUser,
) -> Result<Json<Vec<ClientPrice>>, ApiError> {
    let client_id = client.user.owned_client().map_err(|e| e.to_api_error(&locale))?;

    let mut conn = get_scoped_connection(&app_state, &client.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let prices = app_state
        .pricing_service
        .list_for_client(&mut *conn, client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(prices))
}

// PUT /api/clients/{id}/prices
#[utoipa::path(
    put,
    path = "/api/clients/{id}/prices",
    tag = "Pricing",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = SetPricesPayload,
    responses(
        (status = 200, description = "Preços gravados", body = Vec<ClientPrice>),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_client_prices(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: AdminUser,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<SetPricesPayload>,
) -> Result<Json<Vec<ClientPrice>>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut conn = get_scoped_connection(&app_state, &admin.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let prices = app_state
        .pricing_service
        .set_prices(&mut *conn, client_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(prices))
}
