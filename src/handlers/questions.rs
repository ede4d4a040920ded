// src/handlers/questions.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::AppError, models::question::GenerateQuestionsRequest, services::QuestionService};

/// Generates multiple-choice questions for a topic via the configured model.
pub async fn generate_questions(
    State(questions): State<QuestionService>,
    Json(req): Json<GenerateQuestionsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let set = questions
        .generate_questions(&req.topic, req.number_questions)
        .await?;

    Ok(Json(set))
}
