// src/routes.rs

use std::sync::Arc;

use axum::{
    Router, http::Method, middleware,
    routing::{get, patch, post},
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, application, auth, favorite, mission, profile, review},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, missions, users, applications, reviews,
///   freelances, admin).
/// * Applies global middleware (Trace, CORS) and rate limiting on the
///   credential endpoints.
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // Brute-force protection on the credential endpoints, keyed by peer IP.
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .finish()
            .unwrap(),
    );

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/admin/login", post(auth::admin_login))
        .layer(GovernorLayer::new(governor_conf))
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let mission_routes = Router::new()
        .route("/", get(mission::list_missions))
        .route("/{id}", get(mission::get_mission))
        .merge(
            Router::new()
                .route("/", post(mission::create_mission))
                .route(
                    "/{id}",
                    patch(mission::update_mission).delete(mission::delete_mission),
                )
                .route("/{id}/apply", post(application::apply_to_mission))
                .route(
                    "/{id}/applications",
                    get(application::list_mission_applications),
                )
                .route(
                    "/{id}/favorite",
                    post(favorite::add_favorite).delete(favorite::remove_favorite),
                )
                .route("/{id}/is-favorite", get(favorite::is_favorite))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let user_routes = Router::new()
        .route("/{id}", get(profile::get_user))
        .route("/{id}/missions", get(mission::list_client_missions))
        .route("/{id}/reviews", get(review::list_user_reviews))
        .merge(
            Router::new()
                .route("/me", patch(profile::update_me))
                .route("/me/applications", get(application::list_my_applications))
                .route("/me/favorites", get(favorite::list_my_favorites))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let application_routes = Router::new()
        .route("/{id}", patch(application::update_application))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let review_routes = Router::new()
        .route("/", post(review::create_review))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let freelance_routes = Router::new().route("/", get(profile::list_freelances));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route(
            "/users/{id}",
            patch(admin::update_user).delete(admin::delete_user),
        )
        .route("/users/{id}/boost", post(admin::boost_user))
        .route("/missions/{id}/boost", post(admin::boost_mission))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/missions", mission_routes)
        .nest("/api/users", user_routes)
        .nest("/api/applications", application_routes)
        .nest("/api/reviews", review_routes)
        .nest("/api/freelances", freelance_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
