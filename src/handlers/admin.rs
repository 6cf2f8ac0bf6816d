// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        boost::{BoostRequest, expiry_from, validate_duration},
        mission::Mission,
        user::{AdminUpdateUserRequest, User},
    },
    utils::html::clean_html,
};

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(Json(users))
}

/// Updates a user's profile fields (including role).
/// Admin only.
pub async fn update_user(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("UPDATE users SET updated_at = NOW()");

    if let Some(full_name) = payload.full_name {
        builder.push(", full_name = ").push_bind(full_name);
    }
    if let Some(phone_number) = payload.phone_number {
        builder.push(", phone_number = ").push_bind(phone_number);
    }
    if let Some(email) = payload.email {
        let email = Some(email).filter(|e| !e.is_empty());
        builder.push(", email = ").push_bind(email);
    }
    if let Some(role) = payload.role {
        builder.push(", role = ").push_bind(role);
    }
    if let Some(bio) = payload.bio {
        builder.push(", bio = ").push_bind(clean_html(&bio));
    }
    if let Some(skills) = payload.skills {
        builder.push(", skills = ").push_bind(skills);
    }
    if let Some(location) = payload.location {
        builder.push(", location = ").push_bind(location);
    }
    if let Some(avatar) = payload.avatar {
        builder.push(", avatar = ").push_bind(avatar);
    }

    builder.push(" WHERE id = ").push_bind(id);
    builder.push(" RETURNING *");

    let user = builder
        .build_query_as::<User>()
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("unique") || e.to_string().contains("23505") {
                AppError::Conflict("Ce numéro de téléphone est déjà utilisé".to_string())
            } else {
                tracing::error!("Failed to update user: {:?}", e);
                AppError::InternalServerError(e.to_string())
            }
        })?
        .ok_or(AppError::NotFound("Utilisateur non trouvé".to_string()))?;

    Ok(Json(user))
}

/// Deletes a user by ID; their missions, applications, favorites and reviews
/// cascade. Admin only.
pub async fn delete_user(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Utilisateur non trouvé".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Boosts a user's profile for the given number of days.
/// Admin only; the duration must be one of {1, 3, 7, 15, 30}.
pub async fn boost_user(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BoostRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_duration(payload.duration)?;
    let expires_at = expiry_from(Utc::now(), payload.duration);

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET is_boosted = TRUE, boost_expires_at = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(expires_at)
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Utilisateur non trouvé".to_string()))?;

    Ok(Json(user))
}

/// Boosts a mission for the given number of days.
/// Admin only; the duration must be one of {1, 3, 7, 15, 30}.
pub async fn boost_mission(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BoostRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_duration(payload.duration)?;
    let expires_at = expiry_from(Utc::now(), payload.duration);

    let mission = sqlx::query_as::<_, Mission>(
        r#"
        UPDATE missions
        SET is_boosted = TRUE, boost_expires_at = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(expires_at)
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Mission non trouvée".to_string()))?;

    Ok(Json(mission))
}
