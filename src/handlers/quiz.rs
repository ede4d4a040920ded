// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::{
        quiz_attempt::{CompleteAttemptRequest, RecentParams, StartAttemptRequest},
        user::User,
    },
    services::QuizService,
};

/// Starts a new quiz attempt for the caller.
pub async fn start_quiz(
    State(quiz): State<QuizService>,
    Extension(user): Extension<User>,
    Json(req): Json<StartAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = quiz.start_attempt(user.id, req).await?;

    Ok((StatusCode::CREATED, Json(attempt)))
}

/// Submits answers and score for an attempt the caller owns.
pub async fn complete_quiz(
    State(quiz): State<QuizService>,
    Extension(user): Extension<User>,
    Path(attempt_id): Path<i64>,
    Json(req): Json<CompleteAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = quiz.complete_attempt(attempt_id, user.id, req).await?;

    Ok(Json(attempt))
}

pub async fn get_stats(
    State(quiz): State<QuizService>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(quiz.get_stats(user.id).await?))
}

/// Lists the caller's latest attempts (default 10), newest first.
pub async fn get_recent(
    State(quiz): State<QuizService>,
    Extension(user): Extension<User>,
    Query(params): Query<RecentParams>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(quiz.get_recent(user.id, params.limit).await?))
}

pub async fn get_quiz(
    State(quiz): State<QuizService>,
    Extension(user): Extension<User>,
    Path(attempt_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(quiz.get_attempt(attempt_id, user.id).await?))
}
