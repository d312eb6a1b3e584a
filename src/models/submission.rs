// src/models/submission.rs

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::error::AppError;

// =============================================================================
//  TIPOS DE PRODUTO
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Place,      // Tráfego de lugar (place)
    Receipt,    // Avaliação por recibo
    Kakaomap,   // Avaliação no mapa
    Blog,       // Distribuição em blogs
    Cafe,       // Marketing em cafés (comunidades)
    Experience, // Campanha de experiência / influenciadores
    Dynamic,    // Categoria definida pelo admin
}

/// De onde sai o "concluído" de uma campanha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressSource {
    DailyRecords,
    ContentItems,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Place => "place",
            ProductType::Receipt => "receipt",
            ProductType::Kakaomap => "kakaomap",
            ProductType::Blog => "blog",
            ProductType::Cafe => "cafe",
            ProductType::Experience => "experience",
            ProductType::Dynamic => "dynamic",
        }
    }

    pub fn progress_source(&self) -> ProgressSource {
        match self {
            ProductType::Blog | ProductType::Experience => ProgressSource::ContentItems,
            _ => ProgressSource::DailyRecords,
        }
    }
}

impl FromStr for ProductType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "place" => Ok(ProductType::Place),
            "receipt" => Ok(ProductType::Receipt),
            "kakaomap" => Ok(ProductType::Kakaomap),
            "blog" => Ok(ProductType::Blog),
            "cafe" => Ok(ProductType::Cafe),
            "experience" => Ok(ProductType::Experience),
            "dynamic" => Ok(ProductType::Dynamic),
            other => Err(AppError::InvalidInput(format!("unknown product type '{}'", other))),
        }
    }
}

// =============================================================================
//  MÁQUINA DE ESTADOS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    WaitingContent,
    Review,
    RevisionRequested,
    InProgress,
    CancellationRequested,
    Completed,
    AsInProgress, // Reabertura pós-venda (AS)
    Cancelled,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::WaitingContent => "waiting_content",
            SubmissionStatus::Review => "review",
            SubmissionStatus::RevisionRequested => "revision_requested",
            SubmissionStatus::InProgress => "in_progress",
            SubmissionStatus::CancellationRequested => "cancellation_requested",
            SubmissionStatus::Completed => "completed",
            SubmissionStatus::AsInProgress => "as_in_progress",
            SubmissionStatus::Cancelled => "cancelled",
        }
    }

    /// Estados a partir dos quais o cliente pode pedir cancelamento.
    pub fn is_cancellable(self) -> bool {
        matches!(
            self,
            SubmissionStatus::Pending
                | SubmissionStatus::InProgress
                | SubmissionStatus::WaitingContent
                | SubmissionStatus::Review
                | SubmissionStatus::RevisionRequested
        )
    }

    pub fn can_transition_to(self, next: SubmissionStatus) -> bool {
        use SubmissionStatus::*;

        if next == CancellationRequested {
            return self.is_cancellable();
        }

        match self {
            Pending => matches!(next, InProgress | WaitingContent | Cancelled),
            WaitingContent => matches!(next, Review | InProgress | Cancelled),
            Review => matches!(next, RevisionRequested | InProgress | Completed | Cancelled),
            RevisionRequested => matches!(next, Review | Cancelled),
            InProgress => matches!(next, Completed | Cancelled),
            // Aprovado vira cancelado, rejeitado volta para onde estava
            CancellationRequested => next == Cancelled || next.is_cancellable(),
            Completed => next == AsInProgress,
            AsInProgress => next == Completed,
            Cancelled => false,
        }
    }

    pub fn transition(self, next: SubmissionStatus) -> Result<SubmissionStatus, AppError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::InvalidState(format!(
                "{} -> {}",
                self.as_str(),
                next.as_str()
            )))
        }
    }

    /// Transição feita diretamente pelo admin. Entrar ou sair de
    /// `cancellation_requested` é exclusivo do fluxo de cancelamento.
    pub fn admin_transition(self, next: SubmissionStatus) -> Result<SubmissionStatus, AppError> {
        if self == SubmissionStatus::CancellationRequested
            || next == SubmissionStatus::CancellationRequested
        {
            return Err(AppError::InvalidState(format!(
                "{} -> {} must go through a cancellation request",
                self.as_str(),
                next.as_str()
            )));
        }
        self.transition(next)
    }
}

// =============================================================================
//  PAYLOADS POR PRODUTO
// =============================================================================

fn daily_within_total(daily: i64, total: i64) -> Result<(), ValidationErrors> {
    if daily > total {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("daily_exceeds_total");
        err.message = Some("A quantidade diária não pode ser maior que o total.".into());
        errors.add("dailyCount", err);
        return Err(errors);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacePayload {
    #[validate(url(message = "URL inválida."))]
    #[schema(example = "https://map.naver.com/p/entry/place/1234567")]
    pub place_url: String,

    #[validate(length(min = 1, message = "O nome do local é obrigatório."))]
    pub place_name: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[validate(range(min = 1, max = 100_000))]
    #[schema(example = 100)]
    pub daily_count: i64,

    #[validate(range(min = 1, max = 365))]
    #[schema(example = 10)]
    pub total_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptPayload {
    #[validate(url(message = "URL inválida."))]
    pub place_url: String,

    #[validate(length(min = 1, message = "O nome do estabelecimento é obrigatório."))]
    pub business_name: String,

    #[validate(range(min = 1, max = 100_000))]
    pub daily_count: i64,

    #[validate(range(min = 1, max = 1_000_000))]
    pub total_count: i64,

    // Fotos já enviadas ao storage
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KakaomapPayload {
    #[validate(url(message = "URL inválida."))]
    pub place_url: String,

    #[validate(range(min = 1, max = 100_000))]
    pub daily_count: i64,

    #[validate(range(min = 1, max = 1_000_000))]
    pub total_count: i64,

    pub review_guide: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BlogDistribution {
    Manual,
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPayload {
    #[validate(url(message = "URL inválida."))]
    pub target_url: String,

    #[validate(length(min = 1, message = "Informe ao menos uma palavra-chave."))]
    pub keywords: Vec<String>,

    pub distribution: BlogDistribution,

    #[validate(range(min = 1, max = 10_000))]
    pub daily_count: i64,

    #[validate(range(min = 1, max = 100_000))]
    pub total_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CafePayload {
    #[validate(url(message = "URL inválida."))]
    pub target_url: String,

    #[validate(length(min = 1, message = "Informe ao menos um café."))]
    pub cafe_names: Vec<String>,

    pub content_guide: Option<String>,

    #[validate(range(min = 1, max = 100_000))]
    pub total_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePayload {
    #[validate(length(min = 1, message = "O nome da campanha é obrigatório."))]
    pub campaign_name: String,

    #[validate(url(message = "URL inválida."))]
    pub place_url: String,

    // Número de equipes/influenciadores recrutados
    #[validate(range(min = 1, max = 1_000))]
    pub team_count: i64,

    #[validate(length(min = 1, message = "Descreva o que será oferecido."))]
    pub offer_details: String,

    pub recruit_deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DynamicPayload {
    // Slug da categoria dinâmica
    pub category: String,

    // Validado contra o esquema da categoria
    #[schema(value_type = Object)]
    pub form_data: Map<String, Value>,
}

/// O payload específico de cada produto, guardado como JSONB.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "productType", rename_all = "snake_case")]
pub enum SubmissionPayload {
    Place(PlacePayload),
    Receipt(ReceiptPayload),
    Kakaomap(KakaomapPayload),
    Blog(BlogPayload),
    Cafe(CafePayload),
    Experience(ExperiencePayload),
    Dynamic(DynamicPayload),
}

fn parse_variant<T>(fields: Value) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned + Validate,
{
    let payload: T = serde_json::from_value(fields)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    payload.validate()?;
    Ok(payload)
}

impl SubmissionPayload {
    /// Lê o corpo do formulário para o tipo de produto da rota.
    pub fn parse(product_type: ProductType, fields: Value) -> Result<Self, AppError> {
        let payload = match product_type {
            ProductType::Place => SubmissionPayload::Place(parse_variant(fields)?),
            ProductType::Receipt => {
                let p: ReceiptPayload = parse_variant(fields)?;
                daily_within_total(p.daily_count, p.total_count)?;
                SubmissionPayload::Receipt(p)
            }
            ProductType::Kakaomap => {
                let p: KakaomapPayload = parse_variant(fields)?;
                daily_within_total(p.daily_count, p.total_count)?;
                SubmissionPayload::Kakaomap(p)
            }
            ProductType::Blog => {
                let p: BlogPayload = parse_variant(fields)?;
                daily_within_total(p.daily_count, p.total_count)?;
                SubmissionPayload::Blog(p)
            }
            ProductType::Cafe => SubmissionPayload::Cafe(parse_variant(fields)?),
            ProductType::Experience => SubmissionPayload::Experience(parse_variant(fields)?),
            ProductType::Dynamic => {
                let p: DynamicPayload = serde_json::from_value(fields)
                    .map_err(|e| AppError::InvalidInput(e.to_string()))?;
                if p.category.trim().is_empty() {
                    return Err(AppError::InvalidInput("category is required".into()));
                }
                SubmissionPayload::Dynamic(p)
            }
        };
        Ok(payload)
    }

    pub fn product_type(&self) -> ProductType {
        match self {
            SubmissionPayload::Place(_) => ProductType::Place,
            SubmissionPayload::Receipt(_) => ProductType::Receipt,
            SubmissionPayload::Kakaomap(_) => ProductType::Kakaomap,
            SubmissionPayload::Blog(_) => ProductType::Blog,
            SubmissionPayload::Cafe(_) => ProductType::Cafe,
            SubmissionPayload::Experience(_) => ProductType::Experience,
            SubmissionPayload::Dynamic(_) => ProductType::Dynamic,
        }
    }

    /// Slug usado na tabela de preços do cliente.
    pub fn price_category(&self) -> String {
        match self {
            SubmissionPayload::Blog(p) if p.distribution == BlogDistribution::Auto => {
                "blog_auto".to_string()
            }
            SubmissionPayload::Dynamic(p) => p.category.clone(),
            other => other.product_type().as_str().to_string(),
        }
    }

    pub fn requires_auto_distribution(&self) -> bool {
        matches!(self, SubmissionPayload::Blog(p) if p.distribution == BlogDistribution::Auto)
    }

    /// Quantidade total contratada. Para categorias dinâmicas ela vem do
    /// campo de quantidade do esquema, já validado.
    pub fn total_count(&self, dynamic_quantity: Option<i64>) -> Result<i64, AppError> {
        match self {
            SubmissionPayload::Place(p) => p
                .daily_count
                .checked_mul(p.total_days)
                .ok_or_else(|| AppError::InvalidInput("count out of range".into())),
            SubmissionPayload::Receipt(p) => Ok(p.total_count),
            SubmissionPayload::Kakaomap(p) => Ok(p.total_count),
            SubmissionPayload::Blog(p) => Ok(p.total_count),
            SubmissionPayload::Cafe(p) => Ok(p.total_count),
            SubmissionPayload::Experience(p) => Ok(p.team_count),
            SubmissionPayload::Dynamic(_) => dynamic_quantity
                .filter(|q| *q > 0)
                .ok_or_else(|| AppError::InvalidInput("quantity is required".into())),
        }
    }
}

/// Custo em pontos: preço unitário × quantidade total
/// (para `place`, quantidade = diária × dias).
pub fn compute_total_points(unit_price: i64, total_count: i64) -> Result<i64, AppError> {
    if unit_price <= 0 || total_count <= 0 {
        return Err(AppError::InvalidInput("price and count must be positive".into()));
    }
    unit_price
        .checked_mul(total_count)
        .ok_or_else(|| AppError::InvalidInput("total cost out of range".into()))
}

// =============================================================================
//  ENTIDADES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub client_id: Uuid,
    pub product_type: ProductType,

    #[schema(value_type = Object)]
    pub payload: Json<SubmissionPayload>,

    #[schema(example = 1000)]
    pub total_count: i64,
    #[schema(example = 30)]
    pub unit_price: i64,
    #[schema(example = 30000)]
    pub total_points: i64,

    pub status: SubmissionStatus,
    pub start_date: Option<NaiveDate>,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Um registro de execução por campanha por dia
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub record_date: NaiveDate,
    pub actual_count: i64,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// Post/review publicado (blog, experiência)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub url: String,
    pub title: Option<String>,
    pub published_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Progresso derivado, nunca gravado.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub total_count: i64,
    pub completed_count: i64,
    #[schema(value_type = f64, example = 0.3)]
    pub progress_rate: Decimal,
    #[schema(value_type = f64, example = 30.0)]
    pub progress_percent: Decimal,
}

impl Progress {
    pub fn new(total_count: i64, completed_count: i64) -> Self {
        let completed_count = completed_count.max(0);

        let progress_rate = if total_count <= 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(completed_count) / Decimal::from(total_count))
                .min(Decimal::ONE)
                .round_dp(4)
        };

        Progress {
            total_count,
            completed_count,
            progress_rate,
            progress_percent: (progress_rate * Decimal::ONE_HUNDRED).round_dp(2),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub submission: Submission,
    pub progress: Progress,
}

// =============================================================================
//  REQUESTS
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    pub start_date: Option<NaiveDate>,

    // Campos específicos do produto
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubmissionStatusPayload {
    pub status: SubmissionStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDailyRecordPayload {
    #[schema(value_type = String, format = Date, example = "2025-03-01")]
    pub date: NaiveDate,

    #[validate(range(min = 0, max = 1_000_000, message = "A quantidade não pode ser negativa."))]
    pub actual_count: i64,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddContentItemPayload {
    #[validate(url(message = "URL inválida."))]
    pub url: String,
    pub title: Option<String>,
    pub published_at: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SubmissionListQuery {
    pub status: Option<SubmissionStatus>,
    pub product_type: Option<ProductType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use SubmissionStatus::*;

    const ALL: [SubmissionStatus; 9] = [
        Pending,
        WaitingContent,
        Review,
        RevisionRequested,
        InProgress,
        CancellationRequested,
        Completed,
        AsInProgress,
        Cancelled,
    ];

    #[test]
    fn main_lifecycle_is_allowed() {
        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Cancelled));
    }

    #[test]
    fn after_service_loop_can_repeat() {
        let mut status = Completed;
        for _ in 0..3 {
            status = status.transition(AsInProgress).unwrap();
            status = status.transition(Completed).unwrap();
        }
        assert_eq!(status, Completed);
    }

    #[test]
    fn cancelled_is_terminal() {
        for next in ALL {
            assert!(!Cancelled.can_transition_to(next), "cancelled -> {:?}", next);
        }
    }

    #[test]
    fn completed_only_reopens_through_after_service() {
        for next in ALL {
            assert_eq!(Completed.can_transition_to(next), next == AsInProgress);
        }
    }

    #[test]
    fn skipping_execution_is_rejected() {
        assert!(matches!(Pending.transition(Completed), Err(AppError::InvalidState(_))));
        assert!(matches!(AsInProgress.transition(Cancelled), Err(AppError::InvalidState(_))));
    }

    #[test]
    fn cancellation_request_returns_or_cancels() {
        assert!(InProgress.can_transition_to(CancellationRequested));
        assert!(CancellationRequested.can_transition_to(Cancelled));
        assert!(CancellationRequested.can_transition_to(InProgress));
        assert!(CancellationRequested.can_transition_to(Review));
        assert!(!CancellationRequested.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(CancellationRequested));
    }

    #[test]
    fn admin_cannot_shortcut_the_cancellation_workflow() {
        assert!(InProgress.admin_transition(CancellationRequested).is_err());
        assert!(CancellationRequested.admin_transition(Cancelled).is_err());
        assert_eq!(InProgress.admin_transition(Cancelled).unwrap(), Cancelled);
    }

    #[test]
    fn place_cost_is_price_times_daily_times_days() {
        let payload = SubmissionPayload::parse(
            ProductType::Place,
            json!({
                "placeUrl": "https://map.naver.com/p/entry/place/1",
                "placeName": "Cafe Seoul",
                "dailyCount": 100,
                "totalDays": 10
            }),
        )
        .unwrap();

        let total = payload.total_count(None).unwrap();
        assert_eq!(total, 1000);
        assert_eq!(compute_total_points(30, total).unwrap(), 30_000);
        assert_eq!(payload.price_category(), "place");
    }

    #[test]
    fn count_based_products_use_total_count() {
        let payload = SubmissionPayload::parse(
            ProductType::Receipt,
            json!({
                "placeUrl": "https://m.place.naver.com/restaurant/1",
                "businessName": "Bakery",
                "dailyCount": 5,
                "totalCount": 50
            }),
        )
        .unwrap();

        assert_eq!(payload.total_count(None).unwrap(), 50);
        assert_eq!(compute_total_points(1200, 50).unwrap(), 60_000);
    }

    #[test]
    fn daily_count_cannot_exceed_total() {
        let result = SubmissionPayload::parse(
            ProductType::Kakaomap,
            json!({ "placeUrl": "https://place.map.kakao.com/1", "dailyCount": 20, "totalCount": 10 }),
        );
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn auto_blog_distribution_uses_its_own_price_tier() {
        let payload = SubmissionPayload::parse(
            ProductType::Blog,
            json!({
                "targetUrl": "https://example.com/landing",
                "keywords": ["강남 맛집"],
                "distribution": "auto",
                "dailyCount": 1,
                "totalCount": 10
            }),
        )
        .unwrap();

        assert_eq!(payload.price_category(), "blog_auto");
        assert!(payload.requires_auto_distribution());
    }

    #[test]
    fn malformed_payloads_are_invalid_input() {
        let result = SubmissionPayload::parse(ProductType::Cafe, json!({ "targetUrl": 3 }));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn dynamic_payload_needs_a_quantity() {
        let payload = SubmissionPayload::parse(
            ProductType::Dynamic,
            json!({ "category": "shorts", "formData": { "videos": 3 } }),
        )
        .unwrap();

        assert_eq!(payload.price_category(), "shorts");
        assert!(payload.total_count(None).is_err());
        assert_eq!(payload.total_count(Some(3)).unwrap(), 3);
    }

    #[test]
    fn payload_is_stored_with_its_discriminant() {
        let payload = SubmissionPayload::parse(
            ProductType::Experience,
            json!({
                "campaignName": "Spring tasting",
                "placeUrl": "https://example.com/place",
                "teamCount": 8,
                "offerDetails": "Course meal for two"
            }),
        )
        .unwrap();

        let stored = serde_json::to_value(&payload).unwrap();
        assert_eq!(stored["productType"], "experience");
        assert_eq!(stored["teamCount"], 8);
    }

    #[test]
    fn progress_is_capped_at_one_hundred_percent() {
        let p = Progress::new(100, 30);
        assert_eq!(p.progress_rate, Decimal::new(3, 1));
        assert_eq!(p.progress_percent, Decimal::from(30));

        let over = Progress::new(100, 130);
        assert_eq!(over.progress_rate, Decimal::ONE);
        assert_eq!(over.progress_percent, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn unknown_product_type_is_rejected() {
        assert!("tiktok".parse::<ProductType>().is_err());
        assert_eq!("kakaomap".parse::<ProductType>().unwrap(), ProductType::Kakaomap);
    }
}
