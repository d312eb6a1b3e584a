// src/handlers/charge_requests.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
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
        tenancy::ClientScope,
    },
    models::charge::{ChargeRequest, CreateChargeRequestPayload, RejectChargeRequestPayload, ReviewListQuery},
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequestResponse {
    pub success: bool,
    pub charge_request: ChargeRequest,
}

impl From<ChargeRequest> for ChargeRequestResponse {
    fn from(charge_request: ChargeRequest) -> Self {
        Self { success: true, charge_request }
    }
}

// POST /api/charge-requests
#[utoipa::path(
    post,
    path = "/api/charge-requests",
    tag = "Charge Requests",
    request_body = CreateChargeRequestPayload,
    responses(
        (status = 201, description = "Pedido de recarga criado", body = ChargeRequestResponse),
        (status = 400, description = "Valor inválido"),
        (status = 403, description = "Apenas clientes")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_charge_request(
    State(app_state): State<AppState>,
    locale: Locale,
    client: ClientUser,
    Json(payload): Json<CreateChargeRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let client_id = client.user.owned_client().map_err(|e| e.to_api_error(&locale))?;

    let mut conn = get_scoped_connection(&app_state, &client.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let request = app_state
        .charge_service
        .create(&mut *conn, client_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(ChargeRequestResponse::from(request))))
}

// GET /api/charge-requests
#[utoipa::path(
    get,
    path = "/api/charge-requests",
    tag = "Charge Requests",
    params(
        ReviewListQuery,
        ("x-client-id" = Option<Uuid>, Header, description = "Filtro de empresa (admin)")
    ),
    responses(
        (status = 200, description = "Pedidos de recarga", body = Vec<ChargeRequest>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_charge_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    scope: ClientScope,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<Vec<ChargeRequest>>, ApiError> {
    let mut conn = get_scoped_connection(&app_state, &scope.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let requests = app_state
        .charge_service
        .list(&mut *conn, scope.client_id, query.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(requests))
}

// POST /api/charge-requests/{id}/approve
#[utoipa::path(
    post,
    path = "/api/charge-requests/{id}/approve",
    tag = "Charge Requests",
    params(("id" = Uuid, Path, description = "ID do pedido de recarga")),
    responses(
        (status = 200, description = "Recarga aprovada e pontos creditados", body = ChargeRequestResponse),
        (status = 400, description = "Pedido já processado"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_charge_request(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ChargeRequestResponse>, ApiError> {
    let mut conn = get_scoped_connection(&app_state, &admin.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let request = app_state
        .charge_service
        .approve(&mut *conn, id, admin.user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(request.into()))
}

// POST /api/charge-requests/{id}/reject
#[utoipa::path(
    post,
    path = "/api/charge-requests/{id}/reject",
    tag = "Charge Requests",
    params(("id" = Uuid, Path, description = "ID do pedido de recarga")),
    request_body(content = RejectChargeRequestPayload, description = "Motivo (opcional)"),
    responses(
        (status = 200, description = "Recarga rejeitada", body = ChargeRequestResponse),
        (status = 400, description = "Pedido já processado"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_charge_request(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<RejectChargeRequestPayload>>,
) -> Result<Json<ChargeRequestResponse>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let mut conn = get_scoped_connection(&app_state, &admin.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let request = app_state
        .charge_service
        .reject(&mut *conn, id, admin.user.id, payload.reason.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(request.into()))
}
