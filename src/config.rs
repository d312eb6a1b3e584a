// src/config.rs

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        CancellationRepository, CategoryRepository, ChargeRepository, ClientRepository,
        PointsRepository, PricingRepository, SubmissionRepository, UserRepository,
    },
    services::{
        auth::AuthService, cancellation_service::CancellationService, category_service::CategoryService,
        charge_service::ChargeService, client_service::ClientService, ledger_service::LedgerService,
        pricing_service::PricingService, statement_service::StatementService,
        submission_service::SubmissionService,
    },
};

// Lê uma variável opcional, com valor padrão
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválida ({}): {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub listen_addr: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,
    pub jwt_ttl_days: i64,
    pub fonts_dir: PathBuf,
    // (e-mail, senha) do admin criado na inicialização
    pub bootstrap_admin: Option<(String, String)>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let bootstrap_admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some((email, password)),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            listen_addr: env_or("LISTEN_ADDR", "0.0.0.0:3000".to_string())?,
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", 5)?,
            database_acquire_timeout: Duration::from_secs(env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 3)?),
            jwt_ttl_days: env_or("JWT_TTL_DAYS", 7)?,
            fonts_dir: env_or("FONTS_DIR", PathBuf::from("./fonts"))?,
            bootstrap_admin,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub client_service: ClientService,
    pub ledger_service: LedgerService,
    pub charge_service: ChargeService,
    pub submission_service: SubmissionService,
    pub cancellation_service: CancellationService,
    pub pricing_service: PricingService,
    pub category_service: CategoryService,
    pub statement_service: StatementService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(config.database_acquire_timeout)
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, config: &Config) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let client_repo = ClientRepository::new();
        let points_repo = PointsRepository::new();
        let submission_repo = SubmissionRepository::new();

        let auth_service = AuthService::new(
            user_repo,
            client_repo.clone(),
            config.jwt_secret.clone(),
            config.jwt_ttl_days,
            db_pool.clone(),
        );
        let ledger_service = LedgerService::new(client_repo.clone(), points_repo.clone());
        let pricing_service = PricingService::new(PricingRepository::new(), client_repo.clone());
        let category_service = CategoryService::new(CategoryRepository::new());
        let charge_service = ChargeService::new(ChargeRepository::new(), client_repo.clone(), ledger_service.clone());
        let submission_service = SubmissionService::new(
            submission_repo.clone(),
            client_repo.clone(),
            pricing_service.clone(),
            category_service.clone(),
            ledger_service.clone(),
        );
        let cancellation_service = CancellationService::new(
            CancellationRepository::new(),
            submission_repo,
            submission_service.clone(),
            ledger_service.clone(),
        );
        let statement_service = StatementService::new(client_repo.clone(), points_repo, config.fonts_dir.clone());
        let client_service = ClientService::new(client_repo);

        Self {
            db_pool,
            auth_service,
            client_service,
            ledger_service,
            charge_service,
            submission_service,
            cancellation_service,
            pricing_service,
            category_service,
            statement_service,
        }
    }
}
