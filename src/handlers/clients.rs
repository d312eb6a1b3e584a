// src/handlers/clients.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::{db_utils::get_scoped_connection, error::ApiError},
    config::AppState,
    middleware::{i18n::Locale, rbac::AdminUser},
    models::client::{Client, SetAutoDistributionPayload},
};

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    responses(
        (status = 200, description = "Empresas com saldo e pendências", body = Vec<Client>),
        (status = 403, description = "Apenas admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: AdminUser,
) -> Result<Json<Vec<Client>>, ApiError> {
    let mut conn = get_scoped_connection(&app_state, &admin.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let clients = app_state
        .client_service
        .list(&mut *conn)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(clients))
}

// PATCH /api/clients/{id}/auto-distribution
#[utoipa::path(
    patch,
    path = "/api/clients/{id}/auto-distribution",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = SetAutoDistributionPayload,
    responses(
        (status = 200, description = "Permissão de distribuição automática alterada", body = Client),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_auto_distribution(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetAutoDistributionPayload>,
) -> Result<Json<Client>, ApiError> {
    let mut conn = get_scoped_connection(&app_state, &admin.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let client = app_state
        .client_service
        .set_auto_distribution(&mut *conn, id, payload.approved)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(client))
}
