// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n, middleware::i18n::Locale};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Requisição inválida: {0}")]
    InvalidInput(String),

    // Chave do campo -> código do erro (formulários de categoria dinâmica)
    #[error("Dados do formulário inválidos")]
    CustomDataValidationError(HashMap<String, String>),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Estado inválido: {0}")]
    InvalidState(String),

    #[error("Saldo insuficiente (saldo {balance}, necessário {required})")]
    InsufficientBalance { balance: i64, required: i64 },

    #[error("Solicitação já processada")]
    AlreadyProcessed,

    #[error("Nenhum preço configurado para a categoria {0}")]
    NoPriceConfigured(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Resposta de erro já traduzida, pronta para sair pela API.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidInput(_)
            | AppError::CustomDataValidationError(_)
            | AppError::InsufficientBalance { .. }
            | AppError::AlreadyProcessed
            | AppError::NoPriceConfigured(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists | AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::FontNotFound(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Código estável usado no catálogo de mensagens.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::CustomDataValidationError(_) => "validation_failed",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::Forbidden => "forbidden",
            AppError::UserNotFound => "user_not_found",
            AppError::ResourceNotFound(_) => "not_found",
            AppError::InvalidState(_) => "invalid_state",
            AppError::InsufficientBalance { .. } => "insufficient_balance",
            AppError::AlreadyProcessed => "already_processed",
            AppError::NoPriceConfigured(_) => "no_price_configured",
            _ => "internal_error",
        }
    }

    fn param(&self) -> Option<&str> {
        match self {
            AppError::InvalidInput(p)
            | AppError::ResourceNotFound(p)
            | AppError::InvalidState(p)
            | AppError::NoPriceConfigured(p) => Some(p),
            _ => None,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            AppError::CustomDataValidationError(errors) => Some(json!(errors)),
            AppError::InsufficientBalance { balance, required } => {
                Some(json!({ "balance": balance, "required": required }))
            }
            _ => None,
        }
    }

    /// Converte para a resposta da API no idioma do cliente.
    /// Erros internos são logados aqui e nunca expõem detalhes.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let template = i18n::translate(&locale.0, self.code());
        let error = match self.param() {
            Some(p) => template.replace("{0}", p),
            None => template.to_string(),
        };

        ApiError {
            status,
            error,
            details: self.details(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Usado pelos middlewares, que não têm o extrator de idioma.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_errors_map_to_client_statuses() {
        assert_eq!(
            AppError::InsufficientBalance { balance: 0, required: 1 }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::AlreadyProcessed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidState("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::ResourceNotFound("x".into()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let err = AppError::InternalServerError(anyhow::anyhow!("connection refused at 10.0.0.3"));
        let api = err.to_api_error(&Locale("en".into()));

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "An unexpected error occurred.");
        assert!(api.details.is_none());
    }

    #[test]
    fn parameters_are_interpolated_in_the_requested_language() {
        let api = AppError::NoPriceConfigured("place".into()).to_api_error(&Locale("pt".into()));
        assert_eq!(api.error, "Nenhum preço configurado para 'place'.");
    }

    #[test]
    fn insufficient_balance_carries_the_numbers() {
        let api = AppError::InsufficientBalance { balance: 10, required: 25 }
            .to_api_error(&Locale::default());
        assert_eq!(api.details, Some(json!({ "balance": 10, "required": 25 })));
    }
}
