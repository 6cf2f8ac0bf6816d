// src/handlers/application.rs

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
    models::{
        application::{Application, CreateApplicationRequest, UpdateApplicationRequest},
        mission::Mission,
    },
    utils::{html::clean_html, jwt::Claims},
};

/// Applies to a mission.
///
/// A client cannot apply to their own mission, and a freelancer can apply at
/// most once per mission (store-enforced). The mission's applicants_count is
/// incremented in the same transaction as the insert.
pub async fn apply_to_mission(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(mission_id): Path<Uuid>,
    Json(payload): Json<CreateApplicationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let freelancer_id = claims.user_id()?;

    let mission = sqlx::query_as::<_, Mission>("SELECT * FROM missions WHERE id = $1")
        .bind(mission_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Mission non trouvée".to_string()))?;

    if mission.client_id == freelancer_id {
        return Err(AppError::BadRequest(
            "Vous ne pouvez pas candidater à votre propre mission".to_string(),
        ));
    }

    let cover_letter = payload.cover_letter.as_deref().map(clean_html);

    let mut tx = pool.begin().await?;

    let application = sqlx::query_as::<_, Application>(
        r#"
        INSERT INTO applications (mission_id, freelancer_id, cover_letter, proposed_budget)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(mission_id)
    .bind(freelancer_id)
    .bind(&cover_letter)
    .bind(payload.proposed_budget)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if e.to_string().contains("uq_applications_mission_freelancer") {
            AppError::Conflict("Vous avez déjà candidaté à cette mission".to_string())
        } else {
            tracing::error!("Failed to create application: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    sqlx::query(
        "UPDATE missions SET applicants_count = applicants_count + 1, updated_at = NOW() WHERE id = $1",
    )
    .bind(mission_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(application)))
}

/// Lists the applications on a mission. Only the mission owner may see them.
pub async fn list_mission_applications(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(mission_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let mission = sqlx::query_as::<_, Mission>("SELECT * FROM missions WHERE id = $1")
        .bind(mission_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Mission non trouvée".to_string()))?;

    if mission.client_id != user_id {
        return Err(AppError::Forbidden("Non autorisé".to_string()));
    }

    let applications = sqlx::query_as::<_, Application>(
        "SELECT * FROM applications WHERE mission_id = $1 ORDER BY created_at DESC",
    )
    .bind(mission_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(applications))
}

/// Lists the caller's own applications, newest first.
pub async fn list_my_applications(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let freelancer_id = claims.user_id()?;

    let applications = sqlx::query_as::<_, Application>(
        "SELECT * FROM applications WHERE freelancer_id = $1 ORDER BY created_at DESC",
    )
    .bind(freelancer_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(applications))
}

/// Updates an application's status. Allowed for the mission owner (accept /
/// reject) and the applicant (withdraw); the value must be one of the
/// enumerated statuses. applicants_count is deliberately left untouched on
/// withdrawal.
pub async fn update_application(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApplicationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;

    let application = sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Candidature non trouvée".to_string()))?;

    let mission = sqlx::query_as::<_, Mission>("SELECT * FROM missions WHERE id = $1")
        .bind(application.mission_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Mission non trouvée".to_string()))?;

    if mission.client_id != user_id && application.freelancer_id != user_id {
        return Err(AppError::Forbidden("Non autorisé".to_string()));
    }

    let updated = sqlx::query_as::<_, Application>(
        "UPDATE applications SET status = $1 WHERE id = $2 RETURNING *",
    )
    .bind(&payload.status)
    .bind(id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(updated))
}
