// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Minimum mission budget in FCFA, enforced at input validation.
pub const MIN_MISSION_BUDGET: i64 = 1000;

/// Boost durations (in days) an administrator may apply to a user or mission.
pub const BOOST_DURATION_DAYS: [i64; 5] = [1, 3, 7, 15, 30];

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Lifetime of access tokens, in seconds.
    pub jwt_access_expiration: u64,
    /// Lifetime of refresh tokens, in seconds.
    pub jwt_refresh_expiration: u64,
    pub port: u16,
    pub rust_log: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_access_expiration = env::var("JWT_ACCESS_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        let jwt_refresh_expiration = env::var("JWT_REFRESH_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7 * 24 * 3600);

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let admin_username = env::var("ADMIN_USERNAME").ok();
        let admin_password = env::var("ADMIN_PASSWORD").ok();

        Self {
            database_url,
            jwt_secret,
            jwt_access_expiration,
            jwt_refresh_expiration,
            port,
            rust_log,
            admin_username,
            admin_password,
        }
    }
}
