// src/models/cancellation.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    review::{Decision, ReviewStatus},
    submission::{ProductType, Progress, SubmissionStatus},
};

// Pedido de encerramento antecipado de uma campanha.
// Os números de progresso são uma fotografia do momento do pedido.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancellationRequest {
    pub id: Uuid,
    pub client_id: Uuid,
    pub submission_type: ProductType,
    pub submission_id: Uuid,
    pub reason: Option<String>,

    // --- Snapshot ---
    pub total_count: i64,
    pub completed_count: i64,
    #[schema(value_type = f64, example = 0.3)]
    pub progress_rate: Decimal,
    pub total_points: i64,

    #[schema(example = 700)]
    pub calculated_refund: i64,

    // Valor definido pelo admin na aprovação (sobrepõe o calculado)
    pub final_refund: Option<i64>,

    // Para onde a campanha volta se o pedido for rejeitado
    pub previous_status: SubmissionStatus,

    pub status: ReviewStatus,
    pub reviewed_by: Option<Uuid>,
    pub admin_response: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// floor(total_points × (total − concluído) / total), com o concluído limitado a [0, total].
/// Usa as contagens e não a taxa arredondada do snapshot.
pub fn calculate_refund(total_points: i64, progress: &Progress) -> i64 {
    if total_points <= 0 {
        return 0;
    }
    if progress.total_count <= 0 {
        return total_points;
    }

    let total = i128::from(progress.total_count);
    let remaining = total - i128::from(progress.completed_count).clamp(0, total);
    let refund = i128::from(total_points) * remaining / total;

    i64::try_from(refund).unwrap_or(0).clamp(0, total_points)
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCancellationPayload {
    pub submission_type: ProductType,
    pub submission_id: Uuid,
    #[schema(example = "Mudança de estratégia")]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessCancellationPayload {
    pub status: Decision,

    #[validate(range(min = 0, message = "O reembolso não pode ser negativo."))]
    pub final_refund: Option<i64>,

    pub admin_response: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refund_follows_the_remaining_work() {
        assert_eq!(calculate_refund(1000, &Progress::new(100, 30)), 700);
    }

    #[test]
    fn refund_is_floored_from_the_exact_ratio() {
        // A taxa do snapshot é 0.3333, mas o reembolso usa 2/3 exato
        let third = Progress::new(3, 1);
        assert_eq!(third.progress_rate, Decimal::new(3333, 4));
        assert_eq!(calculate_refund(1000, &third), 666);
        assert_eq!(calculate_refund(1_000_000, &third), 666_666);

        assert_eq!(calculate_refund(3, &Progress::new(3, 2)), 1);
    }

    #[test]
    fn refund_stays_within_bounds_for_any_progress() {
        for total in [1i64, 7, 1000, 123_456_789, i64::MAX] {
            for (total_count, completed) in [(0, 0), (10, 0), (10, 3), (10, 10), (10, 25), (3, 1), (7, -2)] {
                let refund = calculate_refund(total, &Progress::new(total_count, completed));
                assert!(
                    (0..=total).contains(&refund),
                    "total {} progress {}/{} -> {}",
                    total,
                    completed,
                    total_count,
                    refund
                );
            }
        }
    }

    #[test]
    fn untouched_campaign_refunds_everything() {
        assert_eq!(calculate_refund(30_000, &Progress::new(50, 0)), 30_000);
        assert_eq!(calculate_refund(30_000, &Progress::new(50, 50)), 0);
        assert_eq!(calculate_refund(0, &Progress::new(50, 0)), 0);
    }
}
