//src/main.rs

use anyhow::Context;
use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; padrão "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if let Some((email, password)) = &config.bootstrap_admin {
        app_state
            .auth_service
            .ensure_admin(email, password)
            .await
            .context("Falha ao criar o admin inicial.")?;
    }

    let app = router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Falha ao escutar em {}", config.listen_addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}

fn router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Tudo abaixo exige token; o papel é conferido em cada handler
    let protected_routes = Router::new()
        .route("/users/me", get(handlers::auth::get_me))
        // Recargas
        .route(
            "/charge-requests",
            post(handlers::charge_requests::create_charge_request)
                .get(handlers::charge_requests::list_charge_requests),
        )
        .route(
            "/charge-requests/{id}/approve",
            post(handlers::charge_requests::approve_charge_request),
        )
        .route(
            "/charge-requests/{id}/reject",
            post(handlers::charge_requests::reject_charge_request),
        )
        // Campanhas ({id} é o productType no POST)
        .route("/submissions", get(handlers::submissions::list_submissions))
        .route(
            "/submissions/{id}",
            post(handlers::submissions::create_submission).get(handlers::submissions::get_submission),
        )
        .route(
            "/submissions/{id}/status",
            put(handlers::submissions::update_submission_status)
                .patch(handlers::submissions::update_submission_status),
        )
        .route(
            "/submissions/{id}/daily-records",
            post(handlers::submissions::upsert_daily_record).get(handlers::submissions::list_daily_records),
        )
        .route(
            "/submissions/{id}/content-items",
            post(handlers::submissions::add_content_item).get(handlers::submissions::list_content_items),
        )
        // Cancelamentos
        .route(
            "/cancellation-requests",
            post(handlers::cancellations::create_cancellation_request)
                .get(handlers::cancellations::list_cancellation_requests),
        )
        .route(
            "/cancellation-requests/{id}/process",
            post(handlers::cancellations::process_cancellation_request),
        )
        // Pontos
        .route("/points/transactions", get(handlers::points::list_transactions))
        .route("/points/adjustments", post(handlers::points::adjust_points))
        .route("/points/statement.pdf", get(handlers::points::statement_pdf))
        // Preços e empresas
        .route("/pricing", get(handlers::pricing::get_my_prices))
        .route("/clients", get(handlers::clients::list_clients))
        .route("/clients/{id}/prices", put(handlers::pricing::set_client_prices))
        .route(
            "/clients/{id}/auto-distribution",
            patch(handlers::clients::set_auto_distribution),
        )
        .route(
            "/categories",
            post(handlers::categories::create_category).get(handlers::categories::list_categories),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{path::PathBuf, time::Duration};

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use chrono::Utc;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::models::auth::{Role, User};

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/unused".into(),
            jwt_secret: "router-test-secret".into(),
            listen_addr: "127.0.0.1:0".into(),
            database_max_connections: 1,
            database_acquire_timeout: Duration::from_millis(100),
            jwt_ttl_days: 1,
            fonts_dir: PathBuf::from("./fonts"),
            bootstrap_admin: None,
        }
    }

    // Nenhuma das rotas testadas chega ao banco
    fn test_state() -> AppState {
        let config = test_config();
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        AppState::from_pool(pool, &config)
    }

    fn token_for(state: &AppState, role: Role) -> String {
        let client_id = match role {
            Role::Client => Some(Uuid::new_v4()),
            Role::Admin => None,
        };
        let user = User {
            id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            password_hash: String::new(),
            role,
            client_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        state.auth_service.create_token(&user).unwrap()
    }

    fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = router(test_state());
        let response = app.oneshot(request("GET", "/api/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_document_is_public() {
        let app = router(test_state());
        let response = app
            .oneshot(request("GET", "/api/docs/openapi.json", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        let app = router(test_state());
        let response = app.oneshot(request("GET", "/api/submissions", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let app = router(test_state());
        let response = app
            .oneshot(request("GET", "/api/users/me", Some("not-a-jwt")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn client_cannot_approve_charge_requests() {
        let state = test_state();
        let token = token_for(&state, Role::Client);
        let uri = format!("/api/charge-requests/{}/approve", Uuid::new_v4());

        let response = router(state)
            .oneshot(request("POST", &uri, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn client_cannot_change_submission_status() {
        let state = test_state();
        let token = token_for(&state, Role::Client);
        let uri = format!("/api/submissions/{}/status", Uuid::new_v4());

        let response = router(state)
            .oneshot(request("PATCH", &uri, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_cannot_use_client_only_routes() {
        let state = test_state();
        let token = token_for(&state, Role::Admin);

        let response = router(state)
            .oneshot(request("GET", "/api/pricing", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
