// src/handlers/cancellations.rs

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
    models::{
        cancellation::{CancellationRequest, CreateCancellationPayload, ProcessCancellationPayload},
        charge::ReviewListQuery,
    },
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancellationResponse {
    pub success: bool,
    pub cancellation_request: CancellationRequest,
}

impl From<CancellationRequest> for CancellationResponse {
    fn from(cancellation_request: CancellationRequest) -> Self {
        Self { success: true, cancellation_request }
    }
}

// POST /api/cancellation-requests
#[utoipa::path(
    post,
    path = "/api/cancellation-requests",
    tag = "Cancellations",
    request_body = CreateCancellationPayload,
    responses(
        (status = 201, description = "Cancelamento solicitado com reembolso calculado", body = CancellationResponse),
        (status = 404, description = "Campanha não encontrada"),
        (status = 409, description = "Campanha não pode ser cancelada ou já há pedido pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_cancellation_request(
    State(app_state): State<AppState>,
    locale: Locale,
    client: ClientUser,
    Json(payload): Json<CreateCancellationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let client_id = client.user.owned_client().map_err(|e| e.to_api_error(&locale))?;

    let mut conn = get_scoped_connection(&app_state, &client.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let request = app_state
        .cancellation_service
        .create(&mut *conn, client_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(CancellationResponse::from(request))))
}

// GET /api/cancellation-requests
#[utoipa::path(
    get,
    path = "/api/cancellation-requests",
    tag = "Cancellations",
    params(
        ReviewListQuery,
        ("x-client-id" = Option<Uuid>, Header, description = "Filtro de empresa (admin)")
    ),
    responses(
        (status = 200, description = "Pedidos de cancelamento", body = Vec<CancellationRequest>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_cancellation_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    scope: ClientScope,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<Vec<CancellationRequest>>, ApiError> {
    let mut conn = get_scoped_connection(&app_state, &scope.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let requests = app_state
        .cancellation_service
        .list(&mut *conn, scope.client_id, query.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(requests))
}

// POST /api/cancellation-requests/{id}/process
#[utoipa::path(
    post,
    path = "/api/cancellation-requests/{id}/process",
    tag = "Cancellations",
    params(("id" = Uuid, Path, description = "ID do pedido de cancelamento")),
    request_body = ProcessCancellationPayload,
    responses(
        (status = 200, description = "Pedido processado", body = CancellationResponse),
        (status = 400, description = "Pedido já processado ou reembolso fora do limite"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn process_cancellation_request(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProcessCancellationPayload>,
) -> Result<Json<CancellationResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut conn = get_scoped_connection(&app_state, &admin.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let request = app_state
        .cancellation_service
        .process(&mut *conn, id, admin.user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(request.into()))
}
