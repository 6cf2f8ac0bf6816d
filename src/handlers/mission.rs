// src/handlers/mission.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::mission::{CreateMissionRequest, Mission, MissionFilters, UpdateMissionRequest},
    utils::{html::clean_html, jwt::Claims},
};

/// Lists missions matching the supplied filters, ranked for display:
/// effectively-boosted missions first, newest first within each group.
/// Pure read, no side effects.
pub async fn list_missions(
    State(pool): State<PgPool>,
    Query(filters): Query<MissionFilters>,
) -> Result<impl IntoResponse, AppError> {
    let missions = sqlx::query_as::<_, Mission>("SELECT * FROM missions")
        .fetch_all(&pool)
        .await?;

    Ok(Json(filters.apply(missions, Utc::now())))
}

/// Retrieves a single mission by ID.
pub async fn get_mission(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mission = sqlx::query_as::<_, Mission>("SELECT * FROM missions WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Mission non trouvée".to_string()))?;

    Ok(Json(mission))
}

/// Publishes a new mission owned by the caller.
pub async fn create_mission(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateMissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let client_id = claims.user_id()?;
    let description = clean_html(&payload.description);

    let mission = sqlx::query_as::<_, Mission>(
        r#"
        INSERT INTO missions
        (client_id, title, description, category, budget, budget_type, location, is_remote, duration, skills_required, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(client_id)
    .bind(&payload.title)
    .bind(&description)
    .bind(&payload.category)
    .bind(payload.budget)
    .bind(payload.budget_type.as_deref().unwrap_or("fixed"))
    .bind(&payload.location)
    .bind(payload.is_remote.unwrap_or(false))
    .bind(&payload.duration)
    .bind(&payload.skills_required)
    .bind(payload.status.as_deref().unwrap_or("open"))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create mission: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(mission)))
}

/// Updates a mission. Only the owning client may update it; supplied fields
/// are merged, updated_at is refreshed.
pub async fn update_mission(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;

    let mission = sqlx::query_as::<_, Mission>("SELECT * FROM missions WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Mission non trouvée".to_string()))?;

    if mission.client_id != user_id {
        return Err(AppError::Forbidden("Non autorisé".to_string()));
    }

    if payload.is_empty() {
        return Ok(Json(mission));
    }

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("UPDATE missions SET updated_at = NOW()");

    if let Some(title) = payload.title {
        builder.push(", title = ").push_bind(title);
    }
    if let Some(description) = payload.description {
        builder.push(", description = ").push_bind(clean_html(&description));
    }
    if let Some(category) = payload.category {
        builder.push(", category = ").push_bind(category);
    }
    if let Some(budget) = payload.budget {
        builder.push(", budget = ").push_bind(budget);
    }
    if let Some(budget_type) = payload.budget_type {
        builder.push(", budget_type = ").push_bind(budget_type);
    }
    if let Some(location) = payload.location {
        builder.push(", location = ").push_bind(location);
    }
    if let Some(is_remote) = payload.is_remote {
        builder.push(", is_remote = ").push_bind(is_remote);
    }
    if let Some(duration) = payload.duration {
        builder.push(", duration = ").push_bind(duration);
    }
    if let Some(skills_required) = payload.skills_required {
        builder.push(", skills_required = ").push_bind(skills_required);
    }
    if let Some(status) = payload.status {
        // Flat label by design, any value is accepted.
        builder.push(", status = ").push_bind(status);
    }

    builder.push(" WHERE id = ").push_bind(id);
    builder.push(" RETURNING *");

    let updated = builder
        .build_query_as::<Mission>()
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update mission: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?
        .ok_or(AppError::NotFound("Mission non trouvée".to_string()))?;

    Ok(Json(updated))
}

/// Deletes a mission. Only the owning client may delete it.
pub async fn delete_mission(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let mission = sqlx::query_as::<_, Mission>("SELECT * FROM missions WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Mission non trouvée".to_string()))?;

    if mission.client_id != user_id {
        return Err(AppError::Forbidden("Non autorisé".to_string()));
    }

    sqlx::query("DELETE FROM missions WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete mission: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Lists the missions published by a client, newest first.
pub async fn list_client_missions(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let missions = sqlx::query_as::<_, Mission>(
        "SELECT * FROM missions WHERE client_id = $1 ORDER BY created_at DESC",
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(missions))
}
