// src/models/mission.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::config::MIN_MISSION_BUDGET;

use super::boost;

/// Represents the 'missions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: uuid::Uuid,

    /// The client who published the mission. Immutable after creation.
    pub client_id: uuid::Uuid,

    pub title: String,
    pub description: String,
    pub category: String,

    /// Budget in FCFA.
    pub budget: i32,
    pub budget_type: String,

    pub location: Option<String>,
    pub is_remote: bool,
    pub duration: Option<String>,
    pub skills_required: Option<Vec<String>>,

    /// Flat label ('open', 'in_progress', ...), not an enforced state machine.
    pub status: String,

    /// Incremented by application creation, never decremented.
    pub applicants_count: i32,

    pub is_boosted: bool,
    pub boost_expires_at: Option<chrono::DateTime<chrono::Utc>>,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Mission {
    /// Expiry-aware boosted state used by every ranking and filtering path.
    pub fn is_currently_boosted(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        boost::currently_boosted(self.is_boosted, self.boost_expires_at, now)
    }
}

fn validate_budget(budget: i32) -> Result<(), ValidationError> {
    if i64::from(budget) < MIN_MISSION_BUDGET {
        return Err(ValidationError::new("budget_too_low")
            .with_message("Le budget minimum est de 1000 FCFA".into()));
    }
    Ok(())
}

/// DTO for publishing a mission.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMissionRequest {
    #[validate(length(min = 10, message = "Le titre doit contenir au moins 10 caractères"))]
    pub title: String,

    #[validate(length(
        min = 50,
        message = "La description doit contenir au moins 50 caractères"
    ))]
    pub description: String,

    #[validate(length(min = 1, max = 100))]
    pub category: String,

    #[validate(custom(function = validate_budget))]
    pub budget: i32,

    /// Defaults to 'fixed'.
    #[validate(length(max = 20))]
    pub budget_type: Option<String>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    pub is_remote: Option<bool>,

    #[validate(length(max = 50))]
    pub duration: Option<String>,

    pub skills_required: Option<Vec<String>>,

    /// Defaults to 'open'.
    pub status: Option<String>,
}

/// DTO for a client updating their mission. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMissionRequest {
    #[validate(length(min = 10, message = "Le titre doit contenir au moins 10 caractères"))]
    pub title: Option<String>,

    #[validate(length(
        min = 50,
        message = "La description doit contenir au moins 50 caractères"
    ))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,

    #[validate(custom(function = validate_budget))]
    pub budget: Option<i32>,

    #[validate(length(max = 20))]
    pub budget_type: Option<String>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    pub is_remote: Option<bool>,

    #[validate(length(max = 50))]
    pub duration: Option<String>,

    pub skills_required: Option<Vec<String>>,

    pub status: Option<String>,
}

impl UpdateMissionRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.budget.is_none()
            && self.budget_type.is_none()
            && self.location.is_none()
            && self.is_remote.is_none()
            && self.duration.is_none()
            && self.skills_required.is_none()
            && self.status.is_none()
    }
}

/// Query parameters of the mission listing endpoint. An absent field imposes
/// no constraint; supplied fields are ANDed together. Numeric and boolean
/// parameters that fail to parse are rejected with 400 by the typed `Query`
/// extractor rather than silently coerced.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionFilters {
    /// Comma-separated category labels; a mission matches any one of them.
    pub category: Option<String>,
    /// Inclusive lower bound on the budget.
    pub min_budget: Option<i32>,
    /// Inclusive upper bound on the budget.
    pub max_budget: Option<i32>,
    /// Comma-separated location labels; missions without a location never
    /// match a location filter.
    pub location: Option<String>,
    pub is_remote: Option<bool>,
    /// Inverse filter: `isOnSite=true` selects missions that are NOT remote.
    pub is_on_site: Option<bool>,
    /// Matched against the expiry-aware boosted state, not the raw flag.
    pub is_boosted: Option<bool>,
    pub status: Option<String>,
    /// Case-insensitive substring over title OR description.
    pub search: Option<String>,
}

fn list_contains(list: &str, value: &str) -> bool {
    list.split(',').map(str::trim).any(|item| item == value)
}

impl MissionFilters {
    /// The AND of all supplied per-field predicates.
    pub fn matches(&self, mission: &Mission, now: chrono::DateTime<chrono::Utc>) -> bool {
        if let Some(categories) = &self.category {
            if !list_contains(categories, &mission.category) {
                return false;
            }
        }
        if let Some(min) = self.min_budget {
            if mission.budget < min {
                return false;
            }
        }
        if let Some(max) = self.max_budget {
            if mission.budget > max {
                return false;
            }
        }
        if let Some(locations) = &self.location {
            match &mission.location {
                Some(location) => {
                    if !list_contains(locations, location) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        if let Some(remote) = self.is_remote {
            if mission.is_remote != remote {
                return false;
            }
        }
        if let Some(on_site) = self.is_on_site {
            if mission.is_remote != !on_site {
                return false;
            }
        }
        if let Some(boosted) = self.is_boosted {
            if mission.is_currently_boosted(now) != boosted {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if &mission.status != status {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !mission.title.to_lowercase().contains(&needle)
                && !mission.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }

    /// Filters and ranks a mission set for display: keep the missions
    /// matching every supplied predicate, then sort effectively-boosted
    /// missions first and newest first within each group.
    pub fn apply(
        &self,
        mut missions: Vec<Mission>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Vec<Mission> {
        missions.retain(|mission| self.matches(mission, now));
        missions.sort_by(|a, b| {
            boost::boosted_first(
                a.is_currently_boosted(now),
                a.created_at,
                b.is_currently_boosted(now),
                b.created_at,
            )
        });
        missions
    }
}
