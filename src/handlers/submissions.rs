// src/handlers/submissions.rs

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
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
    models::submission::{
        AddContentItemPayload, ContentItem, CreateSubmissionRequest, DailyRecord, ProductType, Submission,
        SubmissionDetail, SubmissionListQuery, UpdateSubmissionStatusPayload, UpsertDailyRecordPayload,
    },
};

const IDEMPOTENCY_HEADER: &str = "idempotency-key";

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    pub submission: Submission,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        Self { success: true, submission }
    }
}

/// Lê a `Idempotency-Key`. Vazia conta como ausente.
fn idempotency_key(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(IDEMPOTENCY_HEADER) else {
        return Ok(None);
    };

    let key = value
        .to_str()
        .map_err(|_| AppError::InvalidInput("Idempotency-Key inválida".into()))?
        .trim();

    if key.is_empty() {
        return Ok(None);
    }
    if key.len() > 255 {
        return Err(AppError::InvalidInput("Idempotency-Key muito longa".into()));
    }

    Ok(Some(key.to_string()))
}

// POST /api/submissions/{productType}
#[utoipa::path(
    post,
    path = "/api/submissions/{productType}",
    tag = "Submissions",
    params(
        ("productType" = String, Path, description = "place | receipt | kakaomap | blog | cafe | experience | dynamic"),
        ("Idempotency-Key" = Option<String>, Header, description = "Repetições com a mesma chave não debitam de novo")
    ),
    request_body = CreateSubmissionRequest,
    responses(
        (status = 201, description = "Campanha criada e pontos debitados", body = SubmissionResponse),
        (status = 200, description = "Repetição idempotente: campanha original", body = SubmissionResponse),
        (status = 400, description = "Dados inválidos ou sem preço configurado"),
        (status = 400, description = "Saldo insuficiente"),
        (status = 403, description = "Distribuição automática não liberada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_submission(
    State(app_state): State<AppState>,
    locale: Locale,
    client: ClientUser,
    Path(product_type): Path<String>,
    headers: HeaderMap,
    Json(request): Json<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let product_type: ProductType = product_type.parse().map_err(|e: AppError| e.to_api_error(&locale))?;
    let key = idempotency_key(&headers).map_err(|e| e.to_api_error(&locale))?;
    let client_id = client.user.owned_client().map_err(|e| e.to_api_error(&locale))?;

    let mut conn = get_scoped_connection(&app_state, &client.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let (submission, created) = app_state
        .submission_service
        .create(&mut *conn, client_id, client.user.id, product_type, request, key.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(SubmissionResponse::from(submission))))
}

// GET /api/submissions
#[utoipa::path(
    get,
    path = "/api/submissions",
    tag = "Submissions",
    params(
        SubmissionListQuery,
        ("x-client-id" = Option<Uuid>, Header, description = "Filtro de empresa (admin)")
    ),
    responses(
        (status = 200, description = "Campanhas", body = Vec<Submission>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_submissions(
    State(app_state): State<AppState>,
    locale: Locale,
    scope: ClientScope,
    Query(query): Query<SubmissionListQuery>,
) -> Result<Json<Vec<Submission>>, ApiError> {
    let mut conn = get_scoped_connection(&app_state, &scope.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let submissions = app_state
        .submission_service
        .list(&mut *conn, scope.client_id, &query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(submissions))
}

// GET /api/submissions/{id}
#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    tag = "Submissions",
    params(("id" = Uuid, Path, description = "ID da campanha")),
    responses(
        (status = 200, description = "Campanha com progresso", body = SubmissionDetail),
        (status = 404, description = "Campanha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_submission(
    State(app_state): State<AppState>,
    locale: Locale,
    scope: ClientScope,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionDetail>, ApiError> {
    let mut conn = get_scoped_connection(&app_state, &scope.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let detail = app_state
        .submission_service
        .get(&mut *conn, id, scope.client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(detail))
}

// PUT | PATCH /api/submissions/{id}/status
#[utoipa::path(
    put,
    path = "/api/submissions/{id}/status",
    tag = "Submissions",
    params(("id" = Uuid, Path, description = "ID da campanha")),
    request_body = UpdateSubmissionStatusPayload,
    responses(
        (status = 200, description = "Status alterado", body = SubmissionResponse),
        (status = 404, description = "Campanha não encontrada"),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_submission_status(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubmissionStatusPayload>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let mut conn = get_scoped_connection(&app_state, &admin.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let submission = app_state
        .submission_service
        .update_status(&mut *conn, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(submission.into()))
}

// --- Execução diária ---

// POST /api/submissions/{id}/daily-records
#[utoipa::path(
    post,
    path = "/api/submissions/{id}/daily-records",
    tag = "Submissions",
    params(("id" = Uuid, Path, description = "ID da campanha")),
    request_body = UpsertDailyRecordPayload,
    responses(
        (status = 200, description = "Registro do dia gravado (substitui o anterior)", body = DailyRecord),
        (status = 404, description = "Campanha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn upsert_daily_record(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpsertDailyRecordPayload>,
) -> Result<Json<DailyRecord>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut conn = get_scoped_connection(&app_state, &admin.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let record = app_state
        .submission_service
        .record_daily_progress(&mut *conn, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(record))
}

// GET /api/submissions/{id}/daily-records
#[utoipa::path(
    get,
    path = "/api/submissions/{id}/daily-records",
    tag = "Submissions",
    params(("id" = Uuid, Path, description = "ID da campanha")),
    responses(
        (status = 200, description = "Registros diários", body = Vec<DailyRecord>),
        (status = 404, description = "Campanha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_daily_records(
    State(app_state): State<AppState>,
    locale: Locale,
    scope: ClientScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DailyRecord>>, ApiError> {
    let mut conn = get_scoped_connection(&app_state, &scope.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let records = app_state
        .submission_service
        .list_daily_records(&mut *conn, id, scope.client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(records))
}

// --- Conteúdos publicados ---

// POST /api/submissions/{id}/content-items
#[utoipa::path(
    post,
    path = "/api/submissions/{id}/content-items",
    tag = "Submissions",
    params(("id" = Uuid, Path, description = "ID da campanha")),
    request_body = AddContentItemPayload,
    responses(
        (status = 201, description = "Conteúdo registrado", body = ContentItem),
        (status = 404, description = "Campanha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_content_item(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddContentItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut conn = get_scoped_connection(&app_state, &admin.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let item = app_state
        .submission_service
        .add_content_item(&mut *conn, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(item)))
}

// GET /api/submissions/{id}/content-items
#[utoipa::path(
    get,
    path = "/api/submissions/{id}/content-items",
    tag = "Submissions",
    params(("id" = Uuid, Path, description = "ID da campanha")),
    responses(
        (status = 200, description = "Conteúdos publicados", body = Vec<ContentItem>),
        (status = 404, description = "Campanha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_content_items(
    State(app_state): State<AppState>,
    locale: Locale,
    scope: ClientScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ContentItem>>, ApiError> {
    let mut conn = get_scoped_connection(&app_state, &scope.user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let items = app_state
        .submission_service
        .list_content_items(&mut *conn, id, scope.client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn blank_idempotency_key_counts_as_missing() {
        let mut headers = HeaderMap::new();
        assert_eq!(idempotency_key(&headers).unwrap(), None);

        headers.insert(IDEMPOTENCY_HEADER, HeaderValue::from_static("   "));
        assert_eq!(idempotency_key(&headers).unwrap(), None);

        headers.insert(IDEMPOTENCY_HEADER, HeaderValue::from_static(" abc-123 "));
        assert_eq!(idempotency_key(&headers).unwrap().as_deref(), Some("abc-123"));
    }

    #[test]
    fn oversized_idempotency_key_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(IDEMPOTENCY_HEADER, HeaderValue::from_str(&"k".repeat(256)).unwrap());
        assert!(matches!(idempotency_key(&headers), Err(AppError::InvalidInput(_))));
    }
}
