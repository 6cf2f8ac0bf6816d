// tests/api_tests.rs
//
// Integration tests against a live Postgres. They are `#[ignore]`d so the
// default test run stays self-contained; run them with
// `DATABASE_URL=... cargo test -- --ignored`.

use havjob_backend::{config::Config, routes, state::AppState};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: database_url.clone(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_access_expiration: 600,
        jwt_refresh_expiration: 3600,
        port: 0,
        rust_log: "error".to_string(),
        admin_username: Some("admin_test".to_string()),
        admin_password: Some("admin_password_123".to_string()),
    };

    let state = AppState { pool, config };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    address
}

fn unique_phone() -> String {
    let digits = uuid::Uuid::new_v4().as_u128() % 100_000_000;
    format!("+22507{:08}", digits)
}

/// Registers a fresh user and returns (user, access token).
async fn register_user(
    client: &reqwest::Client,
    address: &str,
    role: &str,
) -> (serde_json::Value, String) {
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "phoneNumber": unique_phone(),
            "password": "password123",
            "fullName": "Test User",
            "role": role
        }))
        .send()
        .await
        .expect("Register failed");

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    let token = body["accessToken"].as_str().unwrap().to_string();
    (body["user"].clone(), token)
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn health_check_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn register_returns_user_and_tokens() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "phoneNumber": unique_phone(),
            "password": "password123",
            "fullName": "Traoré Bakary",
            "email": "",
            "role": "client"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["user"]["id"].is_string());
    assert_eq!(body["user"]["role"], "client");
    // The password hash must never be serialized.
    assert!(body["user"].get("password").is_none());
    assert!(body["accessToken"].is_string());
    assert!(body["refreshToken"].is_string());
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn register_fails_validation() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Password shorter than 6 characters
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "phoneNumber": unique_phone(),
            "password": "abc",
            "fullName": "Test User"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn register_duplicate_phone_conflict() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let phone = unique_phone();

    for expected_status in [201, 409] {
        let response = client
            .post(format!("{}/api/auth/register", address))
            .json(&serde_json::json!({
                "phoneNumber": phone,
                "password": "password123",
                "fullName": "Test User"
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status().as_u16(), expected_status);
    }
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn login_and_refresh_flow() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let phone = unique_phone();

    client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "phoneNumber": phone,
            "password": "password123",
            "fullName": "Test User"
        }))
        .send()
        .await
        .expect("Register failed");

    // Wrong password
    let response = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "phoneNumber": phone,
            "password": "wrong_password"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // Valid login
    let login: serde_json::Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "phoneNumber": phone,
            "password": "password123"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let access_token = login["accessToken"].as_str().unwrap();
    let refresh_token = login["refreshToken"].as_str().unwrap();

    // /me with the access token
    let me: serde_json::Value = client
        .get(format!("{}/api/auth/me", address))
        .header("Authorization", format!("Bearer {}", access_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["phoneNumber"], phone);

    // A refresh token is not an access token
    let response = client
        .get(format!("{}/api/auth/me", address))
        .header("Authorization", format!("Bearer {}", refresh_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // Refresh issues a new access token
    let refreshed: serde_json::Value = client
        .post(format!("{}/api/auth/refresh", address))
        .json(&serde_json::json!({ "refreshToken": refresh_token }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(refreshed["accessToken"].is_string());

    // An access token is not a refresh token
    let response = client
        .post(format!("{}/api/auth/refresh", address))
        .json(&serde_json::json!({ "refreshToken": access_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn mission_lifecycle_and_ownership() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (user_a, token_a) = register_user(&client, &address, "client").await;
    let (_user_b, token_b) = register_user(&client, &address, "freelance").await;

    // Budget below the 1000 FCFA minimum is rejected.
    let response = client
        .post(format!("{}/api/missions", address))
        .header("Authorization", format!("Bearer {}", token_a))
        .json(&serde_json::json!({
            "title": "Développement d'un site web",
            "description": "Nous recherchons un développeur web expérimenté pour créer un site complet.",
            "category": "Développement",
            "budget": 500
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // Unauthenticated creation is rejected.
    let response = client
        .post(format!("{}/api/missions", address))
        .json(&serde_json::json!({
            "title": "Développement d'un site web",
            "description": "Nous recherchons un développeur web expérimenté pour créer un site complet.",
            "category": "Développement",
            "budget": 150000
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // Valid creation.
    let mission: serde_json::Value = client
        .post(format!("{}/api/missions", address))
        .header("Authorization", format!("Bearer {}", token_a))
        .json(&serde_json::json!({
            "title": "Développement d'un site web e-commerce",
            "description": "Nous recherchons un développeur web expérimenté pour créer un site e-commerce complet avec paiement intégré.",
            "category": "Développement",
            "budget": 350000,
            "location": "Abidjan",
            "isRemote": false
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let mission_id = mission["id"].as_str().unwrap();
    assert_eq!(mission["clientId"], user_a["id"]);
    assert_eq!(mission["status"], "open");
    assert_eq!(mission["applicantsCount"], 0);
    assert_eq!(mission["isBoosted"], false);

    // Non-owner update is forbidden.
    let response = client
        .patch(format!("{}/api/missions/{}", address, mission_id))
        .header("Authorization", format!("Bearer {}", token_b))
        .json(&serde_json::json!({ "budget": 400000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    // Owner update merges fields; any status label is accepted.
    let updated: serde_json::Value = client
        .patch(format!("{}/api/missions/{}", address, mission_id))
        .header("Authorization", format!("Bearer {}", token_a))
        .json(&serde_json::json!({ "budget": 400000, "status": "still relevant" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["budget"], 400000);
    assert_eq!(updated["status"], "still relevant");
    assert_eq!(updated["title"], mission["title"]);

    // Non-owner delete is forbidden, owner delete succeeds.
    let response = client
        .delete(format!("{}/api/missions/{}", address, mission_id))
        .header("Authorization", format!("Bearer {}", token_b))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = client
        .delete(format!("{}/api/missions/{}", address, mission_id))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let response = client
        .get(format!("{}/api/missions/{}", address, mission_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn mission_filters_and_malformed_input() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (_user, token) = register_user(&client, &address, "client").await;

    // Unique category so the assertions only see this test's missions.
    let category = format!("Cat-{}", uuid::Uuid::new_v4());

    for (title, budget, location, is_remote) in [
        ("Mission un pour le test de filtres", 150_000, "Abidjan", false),
        ("Mission deux pour le test de filtres", 350_000, "Bouaké", true),
        ("Mission trois pour le test de filtres", 800_000, "Abidjan", false),
    ] {
        let response = client
            .post(format!("{}/api/missions", address))
            .header("Authorization", format!("Bearer {}", token))
            .json(&serde_json::json!({
                "title": title,
                "description": "Une description suffisamment longue pour satisfaire la validation du contenu.",
                "category": category,
                "budget": budget,
                "location": location,
                "isRemote": is_remote
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
    }

    // Budget range + category.
    let missions: Vec<serde_json::Value> = client
        .get(format!(
            "{}/api/missions?category={}&minBudget=100000&maxBudget=400000",
            address, category
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(missions.len(), 2);

    // Location list, OR semantics.
    let missions: Vec<serde_json::Value> = client
        .get(format!(
            "{}/api/missions?category={}&location=Abidjan,Bouaké",
            address, category
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(missions.len(), 3);

    // isOnSite=true selects non-remote missions.
    let missions: Vec<serde_json::Value> = client
        .get(format!(
            "{}/api/missions?category={}&isOnSite=true",
            address, category
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(missions.len(), 2);

    // Contradictory remote filters yield an empty set.
    let missions: Vec<serde_json::Value> = client
        .get(format!(
            "{}/api/missions?category={}&isRemote=true&isOnSite=true",
            address, category
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(missions.is_empty());

    // Free-text search is case-insensitive over title and description.
    let missions: Vec<serde_json::Value> = client
        .get(format!(
            "{}/api/missions?category={}&search=MISSION DEUX",
            address, category
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(missions.len(), 1);

    // Malformed numeric input is rejected, not coerced.
    let response = client
        .get(format!("{}/api/missions?minBudget=abc", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}
