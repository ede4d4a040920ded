// src/models/quiz_attempt.rs

use std::{collections::HashSet, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    error::{AppError, AppResult},
    models::question::{QuestionItem, check_questions},
};

pub const MAX_TOPIC_CHARS: usize = 200;

/// Lifecycle state of a quiz attempt. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    #[default]
    Incomplete,
    Completed,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Incomplete => "incomplete",
            AttemptStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttemptStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" => Ok(AttemptStatus::Incomplete),
            "completed" => Ok(AttemptStatus::Completed),
            other => Err(AppError::Validation(format!(
                "Unknown quiz status '{}'",
                other
            ))),
        }
    }
}

/// The option a user picked for one question of the attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    /// Zero-based index into the attempt's question set.
    pub question_index: usize,
    /// `None` when the question was skipped.
    pub selected_option: Option<String>,
}

/// Raw 'quiz_attempts' row. JSON columns are still text here.
#[derive(Debug, Clone, FromRow)]
pub struct AttemptRow {
    pub id: i64,
    pub user_id: i64,
    pub topic: String,
    pub total_questions: i64,
    pub questions_data: String,
    pub answers: Option<String>,
    pub score: Option<i64>,
    pub percentage: Option<f64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A quiz attempt with its serialized columns decoded and checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizAttempt {
    pub id: i64,
    pub user_id: i64,
    pub topic: String,
    pub total_questions: i64,
    pub questions_data: Vec<QuestionItem>,
    pub answers: Option<Vec<SubmittedAnswer>>,
    pub score: Option<i64>,
    pub percentage: Option<f64>,
    pub status: AttemptStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<AttemptRow> for QuizAttempt {
    type Error = AppError;

    /// Decoding re-runs the write-time checks so a corrupt row fails loudly.
    fn try_from(row: AttemptRow) -> Result<Self, Self::Error> {
        let questions: Vec<QuestionItem> = serde_json::from_str(&row.questions_data)
            .map_err(|e| {
                AppError::Validation(format!(
                    "Quiz attempt {} has corrupt question data: {}",
                    row.id, e
                ))
            })?;
        check_questions(&questions)?;

        let answers = match row.answers.as_deref() {
            Some(raw) => {
                let parsed: Vec<SubmittedAnswer> = serde_json::from_str(raw).map_err(|e| {
                    AppError::Validation(format!(
                        "Quiz attempt {} has corrupt answer data: {}",
                        row.id, e
                    ))
                })?;
                check_answers(&parsed, &questions)?;
                Some(parsed)
            }
            None => None,
        };

        let status: AttemptStatus = row.status.parse()?;

        Ok(QuizAttempt {
            id: row.id,
            user_id: row.user_id,
            topic: row.topic,
            total_questions: row.total_questions,
            questions_data: questions,
            answers,
            score: row.score,
            percentage: row.percentage,
            status,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}

/// Validates submitted answers against the question set they refer to.
pub fn check_answers(answers: &[SubmittedAnswer], questions: &[QuestionItem]) -> AppResult<()> {
    let mut seen = HashSet::new();

    for answer in answers {
        let question = questions.get(answer.question_index).ok_or_else(|| {
            AppError::Validation(format!(
                "Answer refers to question {} but the quiz has {} questions",
                answer.question_index,
                questions.len()
            ))
        })?;

        if !seen.insert(answer.question_index) {
            return Err(AppError::Validation(format!(
                "Question {} was answered more than once",
                answer.question_index
            )));
        }

        if let Some(selected) = &answer.selected_option {
            if !question.options.iter().any(|opt| opt == selected) {
                return Err(AppError::Validation(format!(
                    "'{}' is not an option of question {}",
                    selected, answer.question_index
                )));
            }
        }
    }

    Ok(())
}

/// Checks `0 <= score <= total_questions` with a positive total.
pub fn check_score(score: i64, total_questions: i64) -> AppResult<()> {
    if total_questions < 1 {
        return Err(AppError::Validation(
            "total_questions must be at least 1".to_string(),
        ));
    }
    if !(0..=total_questions).contains(&score) {
        return Err(AppError::Validation(format!(
            "score must be between 0 and {}",
            total_questions
        )));
    }
    Ok(())
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `100 * score / total_questions`, rounded to two decimals.
pub fn percentage_of(score: i64, total_questions: i64) -> f64 {
    round2(score as f64 * 100.0 / total_questions as f64)
}

/// DTO for `POST /api/quiz/start`.
#[derive(Debug, Deserialize)]
pub struct StartAttemptRequest {
    pub topic: String,
    pub total_questions: i64,
    pub questions_data: Vec<QuestionItem>,
    #[serde(default)]
    pub status: AttemptStatus,
    /// Only meaningful for pre-scored imports (`status = completed`).
    pub score: Option<i64>,
    pub answers: Option<Vec<SubmittedAnswer>>,
}

/// DTO for `PUT /api/quiz/{id}/complete`.
#[derive(Debug, Deserialize)]
pub struct CompleteAttemptRequest {
    pub answers: Vec<SubmittedAnswer>,
    pub score: i64,
    pub total_questions: i64,
    pub status: Option<AttemptStatus>,
}

/// Aggregates over all attempts owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizStats {
    pub total_quizzes: i64,
    pub completed_quizzes: i64,
    pub incomplete_quizzes: i64,
    pub average_score: f64,
    pub highest_score: i64,
    pub lowest_score: i64,
    pub average_percentage: f64,
}

impl QuizStats {
    /// Builds the stats from the total attempt count and the
    /// `(score, percentage)` pairs of completed attempts.
    pub fn from_outcomes(total_quizzes: i64, completed: &[(i64, f64)]) -> Self {
        let completed_quizzes = completed.len() as i64;

        if completed.is_empty() {
            return Self {
                total_quizzes,
                completed_quizzes: 0,
                incomplete_quizzes: total_quizzes,
                average_score: 0.0,
                highest_score: 0,
                lowest_score: 0,
                average_percentage: 0.0,
            };
        }

        let n = completed.len() as f64;
        let score_sum: i64 = completed.iter().map(|(s, _)| s).sum();
        let pct_sum: f64 = completed.iter().map(|(_, p)| p).sum();
        let highest_score = completed.iter().map(|(s, _)| *s).max().unwrap_or(0);
        let lowest_score = completed.iter().map(|(s, _)| *s).min().unwrap_or(0);

        Self {
            total_quizzes,
            completed_quizzes,
            incomplete_quizzes: total_quizzes - completed_quizzes,
            average_score: round2(score_sum as f64 / n),
            highest_score,
            lowest_score,
            average_percentage: round2(pct_sum / n),
        }
    }
}

/// Payload of `GET /api/quiz/recent`.
#[derive(Debug, Serialize)]
pub struct RecentAttempts {
    pub quizzes: Vec<QuizAttempt>,
    pub stats: QuizStats,
}

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub limit: Option<i64>,
}
