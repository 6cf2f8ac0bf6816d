// src/handlers/favorite.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::favorite::{Favorite, FavoriteMissionResponse},
    utils::jwt::Claims,
};

/// Adds a mission to the caller's favorites.
pub async fn add_favorite(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(mission_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let mission_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM missions WHERE id = $1)")
            .bind(mission_id)
            .fetch_one(&pool)
            .await?;

    if !mission_exists {
        return Err(AppError::NotFound("Mission non trouvée".to_string()));
    }

    let favorite = sqlx::query_as::<_, Favorite>(
        r#"
        INSERT INTO favorites (user_id, mission_id)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(mission_id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("uq_favorites_user_mission") {
            AppError::Conflict("Cette mission est déjà dans vos favoris".to_string())
        } else {
            tracing::error!("Failed to add favorite: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    Ok((StatusCode::CREATED, Json(favorite)))
}

/// Removes a mission from the caller's favorites.
pub async fn remove_favorite(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(mission_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND mission_id = $2")
        .bind(user_id)
        .bind(mission_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "Cette mission n'est pas dans vos favoris".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Whether the caller has favorited the given mission.
pub async fn is_favorite(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(mission_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let is_favorite = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND mission_id = $2)",
    )
    .bind(user_id)
    .bind(mission_id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(serde_json::json!({ "isFavorite": is_favorite })))
}

/// Lists the caller's favorites joined with mission info, newest first.
pub async fn list_my_favorites(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let favorites = sqlx::query_as::<_, FavoriteMissionResponse>(
        r#"
        SELECT
            f.mission_id, m.title, m.category, m.budget,
            f.created_at AS favorited_at
        FROM favorites f
        JOIN missions m ON f.mission_id = m.id
        WHERE f.user_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(favorites))
}
