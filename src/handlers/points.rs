// src/handlers/points.rs

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        db_utils::get_scoped_connection,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{i18n::Locale, rbac::AdminUser, tenancy::ClientScope},
    models::points::{AdjustPointsPayload, PointTransaction, StatementQuery, TransactionQuery},
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub success: bool,
    pub transaction: PointTransaction,
}

// GET /api/points/transactions
#[utoipa::path(
    get,
    path = "/api/points/transactions",
    tag = "Points",
    params(
        TransactionQuery,
        ("x-client-id" = Option<uuid::Uuid>, Header, description = "Filtro de empresa (admin)")
    ),
    responses(
        (status = 200, description = "Lançamentos, mais recentes primeiro", body = Vec<PointTransaction>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    scope: ClientScope,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<PointTransaction>>, ApiError> {
    let mut conn = get_scoped_connection(&app_state, &scope.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let entries = app_state
        .ledger_service
        .history(&mut *conn, scope.client_id, &query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(entries))
}

// POST /api/points/adjustments
#[utoipa::path(
    post,
    path = "/api/points/adjustments",
    tag = "Points",
    request_body = AdjustPointsPayload,
    responses(
        (status = 201, description = "Ajuste lançado", body = TransactionResponse),
        (status = 400, description = "Saldo insuficiente para o débito"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn adjust_points(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: AdminUser,
    Json(payload): Json<AdjustPointsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut conn = get_scoped_connection(&app_state, &admin.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let transaction = app_state
        .ledger_service
        .adjust(&mut *conn, admin.user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(TransactionResponse { success: true, transaction })))
}

// GET /api/points/statement.pdf
#[utoipa::path(
    get,
    path = "/api/points/statement.pdf",
    tag = "Points",
    params(
        StatementQuery,
        ("x-client-id" = Option<uuid::Uuid>, Header, description = "Empresa do extrato (obrigatório para admin)")
    ),
    responses(
        (status = 200, description = "Extrato em PDF", content_type = "application/pdf"),
        (status = 400, description = "Empresa não informada")
    ),
    security(("api_jwt" = []))
)]
pub async fn statement_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    scope: ClientScope,
    Query(query): Query<StatementQuery>,
) -> Result<Response, ApiError> {
    let client_id = scope.require_client().map_err(|e| e.to_api_error(&locale))?;

    let mut conn = get_scoped_connection(&app_state, &scope.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let pdf_bytes = app_state
        .statement_service
        .generate_statement_pdf(&mut *conn, client_id, query.from, query.to)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    // Headers para o navegador baixar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"extrato_{}.pdf\"", client_id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
