use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{boost, user::{UpdateProfileRequest, User}},
    utils::{html::clean_html, jwt::Claims},
};

/// Public profile of a user. The password hash is never serialized.
pub async fn get_user(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Utilisateur non trouvé".to_string()))?;

    Ok(Json(user))
}

/// Updates the caller's own profile. Only the allowed fields are merged;
/// role, rating and boost state are admin- or system-managed.
pub async fn update_me(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;

    if payload.is_empty() {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&pool)
            .await?
            .ok_or(AppError::NotFound("Utilisateur non trouvé".to_string()))?;
        return Ok(Json(user));
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
        // "" clears the optional email.
        let email = Some(email).filter(|e| !e.is_empty());
        builder.push(", email = ").push_bind(email);
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

    builder.push(" WHERE id = ").push_bind(user_id);
    builder.push(" RETURNING *");

    let user = builder
        .build_query_as::<User>()
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("unique") || e.to_string().contains("23505") {
                AppError::Conflict("Ce numéro de téléphone est déjà utilisé".to_string())
            } else {
                tracing::error!("Failed to update profile: {:?}", e);
                AppError::InternalServerError(e.to_string())
            }
        })?
        .ok_or(AppError::NotFound("Utilisateur non trouvé".to_string()))?;

    Ok(Json(user))
}

/// Lists freelance profiles ready for display: role freelance/both with a
/// non-empty bio and at least one skill. Effectively-boosted profiles come
/// first, then newest.
pub async fn list_freelances(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let mut freelances = sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users
        WHERE role IN ('freelance', 'both')
          AND bio IS NOT NULL AND btrim(bio) <> ''
          AND skills IS NOT NULL AND cardinality(skills) > 0
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let now = Utc::now();
    freelances.sort_by(|a, b| {
        boost::boosted_first(
            a.is_currently_boosted(now),
            a.created_at,
            b.is_currently_boosted(now),
            b.created_at,
        )
    });

    Ok(Json(freelances))
}
