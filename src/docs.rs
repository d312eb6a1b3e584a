// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Charge Requests ---
        handlers::charge_requests::create_charge_request,
        handlers::charge_requests::list_charge_requests,
        handlers::charge_requests::approve_charge_request,
        handlers::charge_requests::reject_charge_request,

        // --- Submissions ---
        handlers::submissions::create_submission,
        handlers::submissions::list_submissions,
        handlers::submissions::get_submission,
        handlers::submissions::update_submission_status,
        handlers::submissions::upsert_daily_record,
        handlers::submissions::list_daily_records,
        handlers::submissions::add_content_item,
        handlers::submissions::list_content_items,

        // --- Cancellations ---
        handlers::cancellations::create_cancellation_request,
        handlers::cancellations::list_cancellation_requests,
        handlers::cancellations::process_cancellation_request,

        // --- Points ---
        handlers::points::list_transactions,
        handlers::points::adjust_points,
        handlers::points::statement_pdf,

        // --- Pricing ---
        handlers::pricing::get_my_prices,
        handlers::pricing::set_client_prices,

        // --- Clients ---
        handlers::clients::list_clients,
        handlers::clients::set_auto_distribution,

        // --- Categories ---
        handlers::categories::create_category,
        handlers::categories::list_categories,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterClientPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::MeResponse,

            // --- Clients ---
            models::client::Client,
            models::client::SetAutoDistributionPayload,

            // --- Review ---
            models::review::ReviewStatus,
            models::review::Decision,

            // --- Charge Requests ---
            models::charge::ChargeRequest,
            models::charge::CreateChargeRequestPayload,
            models::charge::RejectChargeRequestPayload,
            handlers::charge_requests::ChargeRequestResponse,

            // --- Points ---
            models::points::TransactionKind,
            models::points::PointTransaction,
            models::points::AdjustPointsPayload,
            handlers::points::TransactionResponse,

            // --- Submissions ---
            models::submission::ProductType,
            models::submission::SubmissionStatus,
            models::submission::PlacePayload,
            models::submission::ReceiptPayload,
            models::submission::KakaomapPayload,
            models::submission::BlogDistribution,
            models::submission::BlogPayload,
            models::submission::CafePayload,
            models::submission::ExperiencePayload,
            models::submission::DynamicPayload,
            models::submission::SubmissionPayload,
            models::submission::Submission,
            models::submission::DailyRecord,
            models::submission::ContentItem,
            models::submission::Progress,
            models::submission::SubmissionDetail,
            models::submission::CreateSubmissionRequest,
            models::submission::UpdateSubmissionStatusPayload,
            models::submission::UpsertDailyRecordPayload,
            models::submission::AddContentItemPayload,
            handlers::submissions::SubmissionResponse,

            // --- Cancellations ---
            models::cancellation::CancellationRequest,
            models::cancellation::CreateCancellationPayload,
            models::cancellation::ProcessCancellationPayload,
            handlers::cancellations::CancellationResponse,

            // --- Pricing ---
            models::pricing::ClientPrice,
            models::pricing::SetPricePayload,
            models::pricing::SetPricesPayload,

            // --- Categories ---
            models::category::FieldType,
            models::category::CategoryField,
            models::category::DynamicCategory,
            models::category::CreateCategoryPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Cadastro de Empresas"),
        (name = "Users", description = "Dados do Usuário e da Empresa"),
        (name = "Charge Requests", description = "Recargas de Pontos"),
        (name = "Submissions", description = "Campanhas, Execução Diária e Conteúdos"),
        (name = "Cancellations", description = "Cancelamentos e Reembolsos"),
        (name = "Points", description = "Livro-razão, Ajustes e Extrato"),
        (name = "Pricing", description = "Preços por Empresa"),
        (name = "Clients", description = "Gestão de Empresas (admin)"),
        (name = "Categories", description = "Categorias Dinâmicas de Produto")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_documented_route_lives_under_api() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/submissions/{productType}"));
        assert!(doc.paths.paths.contains_key("/api/cancellation-requests/{id}/process"));
        assert!(doc.paths.paths.keys().all(|path| path.starts_with("/api/")));
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
