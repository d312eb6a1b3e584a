use sqlx::{pool::PoolConnection, Postgres};

use crate::common::error::AppError;
use crate::config::AppState;
use crate::models::auth::SessionUser;

// ---
// Helper de sessão: identifica quem está usando a conexão
// ---
/// Adquire uma conexão da pool e grava `app.user_id` / `app.role`
/// para que triggers e logs do banco saibam quem está agindo.
pub(crate) async fn get_scoped_connection(
    app_state: &AppState,
    user: &SessionUser,
) -> Result<PoolConnection<Postgres>, AppError> {
    // O operador '?' converte sqlx::Error -> AppError::DatabaseError
    let mut conn = app_state.db_pool.acquire().await?;

    // Conexões voltam para a pool: o valor é sempre sobrescrito na próxima aquisição
    sqlx::query("SELECT set_config('app.user_id', $1, false), set_config('app.role', $2, false)")
        .bind(user.id.to_string())
        .bind(user.role.as_str())
        .execute(&mut *conn)
        .await?;

    Ok(conn)
}

/// Nome da constraint quando o erro é uma violação de unicidade.
pub(crate) fn unique_violation(e: &sqlx::Error) -> Option<&str> {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => db_err.constraint(),
        _ => None,
    }
}
