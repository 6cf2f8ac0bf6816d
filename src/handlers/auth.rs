// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{
        AdminLoginRequest, AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, User,
    },
    utils::{
        hash::{hash_password, verify_password},
        jwt::{
            Claims, ROLE_ADMIN, ROLE_USER, TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH, sign_token,
            sign_token_pair, verify_token,
        },
    },
};

/// Registers a new user with a phone number and password.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created with the user (excluding password) and a token pair.
pub async fn register(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;
    let role = payload.role.as_deref().unwrap_or("freelance");
    // The frontend submits "" when the email field is left blank.
    let email = payload.email.as_deref().filter(|e| !e.is_empty());

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (phone_number, password, full_name, email, role, location)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&payload.phone_number)
    .bind(&hashed_password)
    .bind(&payload.full_name)
    .bind(email)
    .bind(role)
    .bind(&payload.location)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        // Postgres error code for unique violation is 23505
        if e.to_string().contains("unique") || e.to_string().contains("23505") {
            AppError::Conflict("Ce numéro de téléphone est déjà utilisé".to_string())
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    let tokens = sign_token_pair(&user.id.to_string(), ROLE_USER, &config)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }),
    ))
}

/// Authenticates a user by phone number and password.
///
/// Unknown number and wrong password produce the same 401 message so the
/// endpoint does not leak which numbers are registered.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone_number = $1")
        .bind(&payload.phone_number)
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    let user = user.ok_or(AppError::AuthError(
        "Numéro de téléphone ou mot de passe incorrect".to_string(),
    ))?;

    let is_valid = verify_password(&payload.password, &user.password)?;

    if !is_valid {
        return Err(AppError::AuthError(
            "Numéro de téléphone ou mot de passe incorrect".to_string(),
        ));
    }

    let tokens = sign_token_pair(&user.id.to_string(), ROLE_USER, &config)?;

    Ok(Json(AuthResponse {
        user,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Exchanges a valid refresh token for a new access token.
pub async fn refresh(
    State(config): State<Config>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let claims = verify_token(
        &payload.refresh_token,
        &config.jwt_secret,
        TOKEN_TYPE_REFRESH,
    )?;

    let access_token = sign_token(
        &claims.sub,
        &claims.role,
        TOKEN_TYPE_ACCESS,
        &config.jwt_secret,
        config.jwt_access_expiration,
    )?;

    Ok(Json(json!({ "accessToken": access_token })))
}

/// Returns the authenticated user's own record.
pub async fn me(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Utilisateur non trouvé".to_string()))?;

    Ok(Json(user))
}

/// Authenticates the administrator against configuration-supplied
/// credentials and returns an access token carrying the 'admin' role.
/// There is no users row behind the administrator; the token is the whole
/// authorization context.
pub async fn admin_login(
    State(config): State<Config>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) else {
        return Err(AppError::AuthError(
            "Administration désactivée".to_string(),
        ));
    };

    if &payload.username != username || &payload.password != password {
        return Err(AppError::AuthError(
            "Identifiant ou mot de passe incorrect".to_string(),
        ));
    }

    let token = sign_token(
        ROLE_ADMIN,
        ROLE_ADMIN,
        TOKEN_TYPE_ACCESS,
        &config.jwt_secret,
        config.jwt_access_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer"
    })))
}
