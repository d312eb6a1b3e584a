// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::SessionUser,
};

// Filtro opcional de empresa usado pelo admin
const CLIENT_ID_HEADER: &str = "x-client-id";

/// Quais dados de cliente a requisição enxerga.
/// Usuário cliente: sempre a própria empresa. Admin: todas (`None`) ou a do cabeçalho.
#[derive(Debug, Clone)]
pub struct ClientScope {
    pub user: SessionUser,
    pub client_id: Option<Uuid>,
}

impl ClientScope {
    pub fn resolve(user: SessionUser, header: Option<&str>) -> Result<Self, AppError> {
        let client_id = match user.client_id {
            Some(own) => Some(own),
            None => header
                .map(|raw| {
                    Uuid::parse_str(raw.trim())
                        .map_err(|_| AppError::InvalidInput(format!("{} inválido", CLIENT_ID_HEADER)))
                })
                .transpose()?,
        };

        Ok(Self { user, client_id })
    }

    /// Para operações que precisam de exatamente uma empresa.
    pub fn require_client(&self) -> Result<Uuid, AppError> {
        self.client_id
            .ok_or_else(|| AppError::InvalidInput(format!("{} é obrigatório", CLIENT_ID_HEADER)))
    }
}

impl<S> FromRequestParts<S> for ClientScope
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        let header = parts
            .headers
            .get(CLIENT_ID_HEADER)
            .map(|value| value.to_str().unwrap_or_default());

        ClientScope::resolve(user, header).map_err(|e| e.to_api_error(&Locale::from_parts(parts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;

    fn session(role: Role, client_id: Option<Uuid>) -> SessionUser {
        SessionUser { id: Uuid::new_v4(), role, client_id }
    }

    #[test]
    fn client_users_cannot_look_at_other_clients() {
        let own = Uuid::new_v4();
        let other = Uuid::new_v4().to_string();

        let scope = ClientScope::resolve(session(Role::Client, Some(own)), Some(&other)).unwrap();
        assert_eq!(scope.client_id, Some(own));
    }

    #[test]
    fn admins_see_everything_unless_they_filter() {
        let scope = ClientScope::resolve(session(Role::Admin, None), None).unwrap();
        assert_eq!(scope.client_id, None);
        assert!(scope.require_client().is_err());

        let target = Uuid::new_v4();
        let scope = ClientScope::resolve(session(Role::Admin, None), Some(&target.to_string())).unwrap();
        assert_eq!(scope.client_id, Some(target));
    }

    #[test]
    fn malformed_filter_is_rejected() {
        let result = ClientScope::resolve(session(Role::Admin, None), Some("acme"));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
