// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, User},
    services::AuthService,
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(auth): State<AuthService>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth.register(payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns a bearer token plus the user view.
pub async fn login(
    State(auth): State<AuthService>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = auth.authenticate(&payload.username, &payload.password).await?;

    Ok(Json(response))
}

/// Stateless logout: the client is expected to discard its token.
pub async fn logout(
    State(auth): State<AuthService>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    tracing::info!(user_id = user.id, "User logged out");
    Json(auth.logout())
}

/// Returns the profile of the authenticated caller.
pub async fn profile(Extension(user): Extension<User>) -> impl IntoResponse {
    Json(user)
}
