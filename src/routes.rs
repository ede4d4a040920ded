// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, health, questions, quiz},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public: root, health, register and login.
/// * Everything else requires a bearer token.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        // Protected auth routes
        .merge(
            Router::new()
                .route("/logout", post(auth::logout))
                .route("/profile", get(auth::profile))
                .layer(require_auth.clone()),
        );

    let question_routes = Router::new()
        .route("/api/generate-questions", post(questions::generate_questions))
        .layer(require_auth.clone());

    // Static segments win over `/{id}` in axum's matcher.
    let quiz_routes = Router::new()
        .route("/start", post(quiz::start_quiz))
        .route("/stats", get(quiz::get_stats))
        .route("/recent", get(quiz::get_recent))
        .route("/{id}", get(quiz::get_quiz))
        .route("/{id}/complete", put(quiz::complete_quiz))
        .layer(require_auth);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .nest("/api/auth", auth_routes)
        .merge(question_routes)
        .nest("/api/quiz", quiz_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
