// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::{ApiError, AppError},
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{Role, SessionUser},
};

/// 1. O Trait que define quais papéis podem passar
pub trait RoleSet: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
}

/// 2. O Extractor (Guardião). Entrega o usuário já verificado.
pub struct RequireRole<T> {
    pub user: SessionUser,
    _role: PhantomData<T>,
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleSet,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai Usuário (401 se não houver sessão)
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        // B. Confere o papel
        if !T::allows(user.role) {
            return Err(AppError::Forbidden.to_api_error(&Locale::from_parts(parts)));
        }

        Ok(RequireRole { user, _role: PhantomData })
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct AdminRole;
impl RoleSet for AdminRole {
    fn allows(role: Role) -> bool {
        role == Role::Admin
    }
}

pub struct ClientRole;
impl RoleSet for ClientRole {
    fn allows(role: Role) -> bool {
        role == Role::Client
    }
}

pub type AdminUser = RequireRole<AdminRole>;
pub type ClientUser = RequireRole<ClientRole>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_sets_are_exclusive() {
        assert!(AdminRole::allows(Role::Admin));
        assert!(!AdminRole::allows(Role::Client));
        assert!(ClientRole::allows(Role::Client));
        assert!(!ClientRole::allows(Role::Admin));
    }
}
