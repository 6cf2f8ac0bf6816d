// src/models/application.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

pub const APPLICATION_STATUSES: [&str; 4] = ["pending", "accepted", "rejected", "withdrawn"];

/// Represents the 'applications' table: a freelancer's bid on a mission.
/// At most one row per (mission, freelancer) pair, enforced by the store.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: uuid::Uuid,
    pub mission_id: uuid::Uuid,
    pub freelancer_id: uuid::Uuid,
    pub cover_letter: Option<String>,
    pub proposed_budget: Option<i32>,
    /// 'pending', 'accepted', 'rejected' or 'withdrawn'.
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for applying to a mission.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    #[validate(length(max = 5000))]
    pub cover_letter: Option<String>,

    #[validate(range(min = 1, message = "Le budget proposé doit être positif"))]
    pub proposed_budget: Option<i32>,
}

fn validate_application_status(status: &str) -> Result<(), ValidationError> {
    if !APPLICATION_STATUSES.contains(&status) {
        return Err(ValidationError::new("invalid_status")
            .with_message("Statut de candidature invalide".into()));
    }
    Ok(())
}

/// DTO for updating an application: only the status may change, and only to
/// one of the enumerated values.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateApplicationRequest {
    #[validate(custom(function = validate_application_status))]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_enum() {
        for status in APPLICATION_STATUSES {
            assert!(validate_application_status(status).is_ok());
        }
        assert!(validate_application_status("open").is_err());
        assert!(validate_application_status("").is_err());
    }
}
