// src/models/favorite.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'favorites' table: a user bookmarking a mission.
/// Row existence is the signal; there are no other attributes.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub mission_id: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for a favorited mission item, including joined mission info.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteMissionResponse {
    pub mission_id: uuid::Uuid,
    pub title: String,
    pub category: String,
    pub budget: i32,
    pub favorited_at: chrono::DateTime<chrono::Utc>,
}
