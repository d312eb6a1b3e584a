// src/models/review.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::error::AppError;

// Estado comum às solicitações revisadas por um admin
// (recarga de pontos e cancelamento). Revisão acontece uma única vez.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn ensure_pending(self) -> Result<(), AppError> {
        match self {
            ReviewStatus::Pending => Ok(()),
            ReviewStatus::Approved | ReviewStatus::Rejected => Err(AppError::AlreadyProcessed),
        }
    }
}

/// A decisão do admin. `pending` não é uma decisão válida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_requests_can_be_reviewed() {
        assert!(ReviewStatus::Pending.ensure_pending().is_ok());
        assert!(matches!(ReviewStatus::Approved.ensure_pending(), Err(AppError::AlreadyProcessed)));
        assert!(matches!(ReviewStatus::Rejected.ensure_pending(), Err(AppError::AlreadyProcessed)));
    }

    #[test]
    fn pending_is_not_a_decision() {
        assert!(serde_json::from_str::<Decision>("\"pending\"").is_err());
        assert_eq!(serde_json::from_str::<Decision>("\"approved\"").unwrap(), Decision::Approved);
    }
}
