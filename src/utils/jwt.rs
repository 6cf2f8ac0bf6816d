// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::Config, error::AppError};

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the caller id (user UUID, or "admin" for the administrator).
    pub sub: String,
    /// Caller's role: 'user' or 'admin'.
    pub role: String,
    /// 'access' or 'refresh'. A refresh token is never accepted where an
    /// access token is required, and vice versa.
    pub token_type: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl Claims {
    /// Parses the subject as a user UUID.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::AuthError("Token invalide".to_string()))
    }
}

/// Access + refresh token pair returned by register/login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs a JWT for the given subject, role and token type.
pub fn sign_token(
    sub: &str,
    role: &str,
    token_type: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: sub.to_owned(),
        role: role.to_owned(),
        token_type: token_type.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Signs the access/refresh pair issued at registration and login.
pub fn sign_token_pair(sub: &str, role: &str, config: &Config) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access_token: sign_token(
            sub,
            role,
            TOKEN_TYPE_ACCESS,
            &config.jwt_secret,
            config.jwt_access_expiration,
        )?,
        refresh_token: sign_token(
            sub,
            role,
            TOKEN_TYPE_REFRESH,
            &config.jwt_secret,
            config.jwt_refresh_expiration,
        )?,
    })
}

/// Verifies and decodes a JWT string, enforcing the expected token type.
pub fn verify_token(token: &str, secret: &str, expected_type: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Token invalide ou expiré".to_string()))?;

    if token_data.claims.token_type != expected_type {
        return Err(AppError::AuthError("Token invalide ou expiré".to_string()));
    }

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests, validates the 'Authorization: Bearer <token>' header
/// against an access token. If valid, injects `Claims` into the request
/// extensions for handlers to use.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => return Err(AppError::AuthError("Token manquant".to_string())),
    };

    let claims = verify_token(token, &config.jwt_secret, TOKEN_TYPE_ACCESS)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Axum Middleware: Admin Authorization.
///
/// Must be used AFTER `auth_middleware`. Checks if the injected `Claims` has
/// the 'admin' role. If not, returns 403 Forbidden.
pub async fn admin_middleware(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(AppError::AuthError("Token manquant".to_string()))?;

    if claims.role != ROLE_ADMIN {
        return Err(AppError::Forbidden("Accès admin requis".to_string()));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_sign_and_verify_access_token() {
        let token = sign_token("some-user-id", ROLE_USER, TOKEN_TYPE_ACCESS, SECRET, 600).unwrap();
        let claims = verify_token(&token, SECRET, TOKEN_TYPE_ACCESS).unwrap();
        assert_eq!(claims.sub, "some-user-id");
        assert_eq!(claims.role, ROLE_USER);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let token = sign_token("some-user-id", ROLE_USER, TOKEN_TYPE_REFRESH, SECRET, 600).unwrap();
        assert!(verify_token(&token, SECRET, TOKEN_TYPE_ACCESS).is_err());
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let token = sign_token("some-user-id", ROLE_USER, TOKEN_TYPE_ACCESS, SECRET, 600).unwrap();
        assert!(verify_token(&token, SECRET, TOKEN_TYPE_REFRESH).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_token("some-user-id", ROLE_USER, TOKEN_TYPE_ACCESS, SECRET, 600).unwrap();
        assert!(verify_token(&token, "other-secret", TOKEN_TYPE_ACCESS).is_err());
    }

    #[test]
    fn test_admin_claims_subject_is_not_a_user_id() {
        let token = sign_token(ROLE_ADMIN, ROLE_ADMIN, TOKEN_TYPE_ACCESS, SECRET, 600).unwrap();
        let claims = verify_token(&token, SECRET, TOKEN_TYPE_ACCESS).unwrap();
        assert!(claims.user_id().is_err());
    }
}
