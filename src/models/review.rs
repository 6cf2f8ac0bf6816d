// src/models/review.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'reviews' table: a rating left on a user for a mission.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: uuid::Uuid,
    pub mission_id: uuid::Uuid,
    pub reviewer_id: uuid::Uuid,
    pub reviewee_id: uuid::Uuid,
    /// 1 to 5.
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for leaving a review. Creating one recomputes the reviewee's
/// aggregate rating and review count.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub mission_id: uuid::Uuid,
    pub reviewee_id: uuid::Uuid,

    #[validate(range(min = 1, max = 5, message = "La note doit être comprise entre 1 et 5"))]
    pub rating: i32,

    #[validate(length(
        min = 10,
        message = "Le commentaire doit contenir au moins 10 caractères"
    ))]
    pub comment: Option<String>,
}
