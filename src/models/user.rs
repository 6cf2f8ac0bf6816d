// src/models/user.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::LazyLock;
use url::Url;
use validator::{Validate, ValidateEmail, ValidationError};

pub const USER_ROLES: [&str; 3] = ["freelance", "client", "both"];

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: uuid::Uuid,

    /// Unique phone number, the login identifier.
    pub phone_number: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub full_name: String,

    pub email: Option<String>,

    /// 'freelance', 'client' or 'both'.
    pub role: String,

    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub location: Option<String>,
    pub avatar: Option<String>,

    /// Rounded integer mean of received review ratings.
    pub rating: i32,
    pub review_count: i32,
    pub completed_missions: i32,
    pub response_rate: i32,

    pub is_boosted: bool,
    pub boost_expires_at: Option<chrono::DateTime<chrono::Utc>>,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Expiry-aware boosted state; the stored flag alone is not enough.
    pub fn is_currently_boosted(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        super::boost::currently_boosted(self.is_boosted, self.boost_expires_at, now)
    }
}

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$").unwrap());

/// Accepts international-style numbers ("+225 07 12 34 56 78"), at least
/// 8 characters of digits, spaces and dashes.
fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if !PHONE_RE.is_match(phone) {
        return Err(ValidationError::new("invalid_phone")
            .with_message("Numéro de téléphone invalide".into()));
    }
    Ok(())
}

/// The reference frontend submits an empty string when the optional email
/// field is left blank, so empty is allowed and normalized away on insert.
fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    if !email.is_empty() && !email.validate_email() {
        return Err(ValidationError::new("invalid_email").with_message("Email invalide".into()));
    }
    Ok(())
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    if !USER_ROLES.contains(&role) {
        return Err(ValidationError::new("invalid_role").with_message("Rôle invalide".into()));
    }
    Ok(())
}

fn validate_avatar_url(avatar: &str) -> Result<(), ValidationError> {
    if Url::parse(avatar).is_err() {
        return Err(ValidationError::new("invalid_url").with_message("URL invalide".into()));
    }
    Ok(())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message("Le nom complet ne peut pas être vide".into()));
    }
    Ok(())
}

/// DTO for phone registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(custom(function = validate_phone_number))]
    pub phone_number: String,

    #[validate(length(
        min = 6,
        message = "Le mot de passe doit contenir au moins 6 caractères"
    ))]
    pub password: String,

    #[validate(length(min = 2, message = "Le nom complet est requis"))]
    pub full_name: String,

    #[validate(custom(function = validate_optional_email))]
    pub email: Option<String>,

    /// Defaults to 'freelance' when absent.
    #[validate(custom(function = validate_role))]
    pub role: Option<String>,

    pub location: Option<String>,
}

/// DTO for phone login.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// DTO for administrator login (credentials come from configuration).
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

/// DTO for exchanging a refresh token against a new access token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// DTO for a user updating their own profile. Only these fields may change
/// through the self-service route; everything else is admin- or
/// system-managed.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(custom(function = validate_not_blank))]
    pub full_name: Option<String>,

    #[validate(custom(function = validate_phone_number))]
    pub phone_number: Option<String>,

    #[validate(custom(function = validate_optional_email))]
    pub email: Option<String>,

    #[validate(length(max = 2000))]
    pub bio: Option<String>,

    pub skills: Option<Vec<String>>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    #[validate(custom(function = validate_avatar_url))]
    pub avatar: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone_number.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.skills.is_none()
            && self.location.is_none()
            && self.avatar.is_none()
    }
}

/// DTO for an administrator updating a user. Same allowed fields as the
/// self-service route, plus the role.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUserRequest {
    #[validate(custom(function = validate_not_blank))]
    pub full_name: Option<String>,

    #[validate(custom(function = validate_phone_number))]
    pub phone_number: Option<String>,

    #[validate(custom(function = validate_optional_email))]
    pub email: Option<String>,

    #[validate(custom(function = validate_role))]
    pub role: Option<String>,

    #[validate(length(max = 2000))]
    pub bio: Option<String>,

    pub skills: Option<Vec<String>>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    #[validate(custom(function = validate_avatar_url))]
    pub avatar: Option<String>,
}

/// Response for register/login: the user plus its token pair.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_validation() {
        assert!(validate_phone_number("+225 07 12 34 56 78").is_ok());
        assert!(validate_phone_number("0712345678").is_ok());
        assert!(validate_phone_number("07 44 55 66 77").is_ok());
        // Too short per the 8-character minimum.
        assert!(validate_phone_number("0712").is_err());
        assert!(validate_phone_number("not a number").is_err());
    }

    #[test]
    fn test_optional_email_allows_empty_string() {
        assert!(validate_optional_email("").is_ok());
        assert!(validate_optional_email("sophie@example.com").is_ok());
        assert!(validate_optional_email("not-an-email").is_err());
    }

    #[test]
    fn test_role_validation() {
        for role in USER_ROLES {
            assert!(validate_role(role).is_ok());
        }
        assert!(validate_role("admin").is_err());
        assert!(validate_role("").is_err());
    }
}
