// src/models/boost.rs

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::cmp::Ordering;

use crate::{config::BOOST_DURATION_DAYS, error::AppError};

/// Body of the admin boost endpoints: a duration in days.
#[derive(Debug, Deserialize)]
pub struct BoostRequest {
    pub duration: i64,
}

/// Rejects any duration outside the fixed set {1, 3, 7, 15, 30}.
pub fn validate_duration(days: i64) -> Result<(), AppError> {
    if !BOOST_DURATION_DAYS.contains(&days) {
        return Err(AppError::BadRequest(
            "Durée invalide. Valeurs acceptées: 1, 3, 7, 15, 30 jours".to_string(),
        ));
    }
    Ok(())
}

pub fn expiry_from(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now + Duration::days(days)
}

/// Effective boosted state. The stored flag alone is never trusted: an
/// entity counts as boosted only while its expiry is unset or in the future.
/// Expired boosts keep their flag until an admin clears it, but rank and
/// filter as unboosted everywhere.
pub fn currently_boosted(
    is_boosted: bool,
    boost_expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    is_boosted && boost_expires_at.is_none_or(|expires| expires > now)
}

/// Display order shared by mission and freelance listings:
/// effectively-boosted entries first, then newest first.
pub fn boosted_first(
    a_boosted: bool,
    a_created_at: DateTime<Utc>,
    b_boosted: bool,
    b_created_at: DateTime<Utc>,
) -> Ordering {
    b_boosted
        .cmp(&a_boosted)
        .then_with(|| b_created_at.cmp(&a_created_at))
}
