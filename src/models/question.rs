// src/models/question.rs

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Minimum number of options a stored or generated question must carry.
pub const MIN_OPTIONS: usize = 2;

/// One multiple-choice question: its text and ordered options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionItem {
    pub question: String,
    pub options: Vec<String>,
}

/// The ordered collection of questions generated for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<QuestionItem>,
}

impl QuestionSet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Checks the shape every persisted or returned question set must have.
    pub fn check(&self) -> AppResult<()> {
        check_questions(&self.questions)
    }
}

/// Shared schema check for question lists, returning `Validation` errors.
pub fn check_questions(questions: &[QuestionItem]) -> AppResult<()> {
    if questions.is_empty() {
        return Err(AppError::Validation(
            "Question set must contain at least one question".to_string(),
        ));
    }

    for (idx, item) in questions.iter().enumerate() {
        if item.question.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Question {} has empty text",
                idx + 1
            )));
        }
        if item.options.len() < MIN_OPTIONS {
            return Err(AppError::Validation(format!(
                "Question {} must have at least {} options",
                idx + 1,
                MIN_OPTIONS
            )));
        }
        if item.options.iter().any(|opt| opt.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "Question {} has an empty option",
                idx + 1
            )));
        }
    }

    Ok(())
}

/// DTO for `POST /api/generate-questions`.
#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub topic: String,
    pub number_questions: i64,
}
