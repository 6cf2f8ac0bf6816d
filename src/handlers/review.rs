// src/handlers/review.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::review::{CreateReviewRequest, Review},
    utils::{html::clean_html, jwt::Claims},
};

/// Rounded integer mean, the aggregate stored on the reviewee.
fn aggregate_rating(sum: i64, count: i64) -> i32 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as i32
}

/// Leaves a review on a user for a mission.
///
/// The reviewee's aggregate rating and review count are recomputed from the
/// review rows in the same transaction as the insert.
pub async fn create_review(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let reviewer_id = claims.user_id()?;

    let mission_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM missions WHERE id = $1)")
            .bind(payload.mission_id)
            .fetch_one(&pool)
            .await?;
    if !mission_exists {
        return Err(AppError::NotFound("Mission non trouvée".to_string()));
    }

    let reviewee_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(payload.reviewee_id)
            .fetch_one(&pool)
            .await?;
    if !reviewee_exists {
        return Err(AppError::NotFound("Utilisateur non trouvé".to_string()));
    }

    let comment = payload.comment.as_deref().map(clean_html);

    let mut tx = pool.begin().await?;

    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (mission_id, reviewer_id, reviewee_id, rating, comment)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(payload.mission_id)
    .bind(reviewer_id)
    .bind(payload.reviewee_id)
    .bind(payload.rating)
    .bind(&comment)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create review: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let (count, sum) = sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(*), COALESCE(SUM(rating), 0) FROM reviews WHERE reviewee_id = $1",
    )
    .bind(payload.reviewee_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE users SET rating = $1, review_count = $2, updated_at = NOW() WHERE id = $3",
    )
    .bind(aggregate_rating(sum, count))
    .bind(count as i32)
    .bind(payload.reviewee_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// Lists the reviews received by a user, newest first.
pub async fn list_user_reviews(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reviews = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE reviewee_id = $1 ORDER BY created_at DESC",
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(reviews))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_rating_exact_mean() {
        assert_eq!(aggregate_rating(8, 2), 4);
        assert_eq!(aggregate_rating(15, 3), 5);
    }

    #[test]
    fn test_aggregate_rating_rounds_to_nearest() {
        // 4 + 5 = 9 over 2 reviews -> 4.5 -> 5
        assert_eq!(aggregate_rating(9, 2), 5);
        // 4 + 5 + 4 = 13 over 3 reviews -> 4.33 -> 4
        assert_eq!(aggregate_rating(13, 3), 4);
    }

    #[test]
    fn test_aggregate_rating_no_reviews() {
        assert_eq!(aggregate_rating(0, 0), 0);
    }
}
