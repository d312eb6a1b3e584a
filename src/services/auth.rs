// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{ClientRepository, UserRepository},
    models::auth::{AuthResponse, Claims, MeResponse, RegisterClientPayload, Role, SessionUser, User},
};

async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    client_repo: ClientRepository,
    jwt_secret: String,
    token_ttl_days: i64,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        client_repo: ClientRepository,
        jwt_secret: String,
        token_ttl_days: i64,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, client_repo, jwt_secret, token_ttl_days, pool }
    }

    /// Cadastra a empresa e o seu primeiro usuário numa única transação.
    pub async fn register_client(&self, payload: &RegisterClientPayload) -> Result<AuthResponse, AppError> {
        // 1. Hashing (fora da transação, não toca no banco)
        let password_hash = hash_password(&payload.password).await?;

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        let client = self
            .client_repo
            .create(
                &mut *tx,
                &payload.company_name,
                payload.business_number.as_deref(),
                payload.contact_name.as_deref(),
                payload.contact_phone.as_deref(),
            )
            .await?;

        // Se o e-mail já existe, a empresa criada acima é desfeita
        let user = self
            .user_repo
            .create_user(&mut *tx, &payload.email, &password_hash, Role::Client, Some(client.id))
            .await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!(client_id = %client.id, "Nova empresa cliente cadastrada");
        self.issue(&user)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.issue(&user)
    }

    /// Resolve o token para (usuário, papel, cliente) sem ir ao banco.
    pub fn validate_token(&self, token: &str) -> Result<SessionUser, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;

        // Token de cliente sem cliente (ou admin com cliente) não é aceito
        match (claims.role, claims.client_id) {
            (Role::Client, Some(_)) | (Role::Admin, None) => Ok(SessionUser {
                id: claims.sub,
                role: claims.role,
                client_id: claims.client_id,
            }),
            _ => Err(AppError::InvalidToken),
        }
    }

    pub async fn me(&self, session: &SessionUser) -> Result<MeResponse, AppError> {
        let user = self
            .user_repo
            .find_by_id(session.id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let client = match user.client_id {
            Some(client_id) => self.client_repo.find_by_id(&self.pool, client_id).await?,
            None => None,
        };

        Ok(MeResponse { user, client })
    }

    /// Cria o admin inicial se ele ainda não existir.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Ok(());
        }

        let password_hash = hash_password(password).await?;
        self.user_repo
            .create_user(&self.pool, email, &password_hash, Role::Admin, None)
            .await?;

        tracing::info!("👤 Usuário admin inicial criado: {}", email);
        Ok(())
    }

    fn issue(&self, user: &User) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            token: self.create_token(user)?,
            role: user.role,
        })
    }

    pub(crate) fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(self.token_ttl_days);

        let claims = Claims {
            sub: user.id,
            role: user.role,
            client_id: user.client_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    fn service(secret: &str) -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AuthService::new(UserRepository::new(pool.clone()), ClientRepository::new(), secret.into(), 7, pool)
    }

    fn user(role: Role, client_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            password_hash: String::new(),
            role,
            client_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn token_round_trip_keeps_role_and_client() {
        let auth = service("secret");
        let client_id = Uuid::new_v4();
        let u = user(Role::Client, Some(client_id));

        let token = auth.create_token(&u).unwrap();
        let session = auth.validate_token(&token).unwrap();

        assert_eq!(session.id, u.id);
        assert_eq!(session.role, Role::Client);
        assert_eq!(session.client_id, Some(client_id));
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let token = service("one").create_token(&user(Role::Admin, None)).unwrap();
        assert!(matches!(service("two").validate_token(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        assert!(matches!(service("s").validate_token("not-a-jwt"), Err(AppError::InvalidToken)));
    }
}
