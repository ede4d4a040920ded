// src/services/quiz.rs

use chrono::Utc;

use crate::{
    config::{DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT},
    error::{AppError, AppResult},
    models::{
        question::check_questions,
        quiz_attempt::{
            AttemptStatus, CompleteAttemptRequest, MAX_TOPIC_CHARS, QuizAttempt, QuizStats,
            RecentAttempts, StartAttemptRequest, check_answers, check_score, percentage_of,
        },
    },
    repositories::{AttemptRepository, Completion, NewAttempt},
};

const ATTEMPT_NOT_FOUND: &str = "Quiz attempt not found";

/// Quiz attempt lifecycle: `incomplete` -> `completed`, plus per-user reporting.
#[derive(Clone)]
pub struct QuizService {
    attempts: AttemptRepository,
}

impl QuizService {
    pub fn new(attempts: AttemptRepository) -> Self {
        Self { attempts }
    }

    /// Persists a new attempt. A `completed` status is accepted for
    /// pre-scored imports and then requires a score.
    pub async fn start_attempt(&self, user_id: i64, req: StartAttemptRequest) -> AppResult<QuizAttempt> {
        let topic = req.topic.trim();
        if topic.is_empty() {
            return Err(AppError::Validation("Topic cannot be empty".to_string()));
        }
        if topic.chars().count() > MAX_TOPIC_CHARS {
            return Err(AppError::Validation(format!(
                "Topic must be at most {} characters",
                MAX_TOPIC_CHARS
            )));
        }

        check_questions(&req.questions_data)?;
        if req.total_questions != req.questions_data.len() as i64 {
            return Err(AppError::Validation(format!(
                "total_questions ({}) does not match the {} questions supplied",
                req.total_questions,
                req.questions_data.len()
            )));
        }

        let now = Utc::now();
        let (score, percentage, completed_at, answers) = match req.status {
            AttemptStatus::Incomplete => {
                if req.score.is_some() || req.answers.is_some() {
                    return Err(AppError::Validation(
                        "score and answers can only be supplied for completed attempts".to_string(),
                    ));
                }
                (None, None, None, None)
            }
            AttemptStatus::Completed => {
                let score = req.score.ok_or_else(|| {
                    AppError::Validation("A completed attempt requires a score".to_string())
                })?;
                check_score(score, req.total_questions)?;

                let answers = match &req.answers {
                    Some(answers) => {
                        check_answers(answers, &req.questions_data)?;
                        Some(serde_json::to_string(answers)?)
                    }
                    None => None,
                };

                (
                    Some(score),
                    Some(percentage_of(score, req.total_questions)),
                    Some(now),
                    answers,
                )
            }
        };

        let new_attempt = NewAttempt {
            user_id,
            topic: topic.to_string(),
            total_questions: req.total_questions,
            questions_data: serde_json::to_string(&req.questions_data)?,
            answers,
            score,
            percentage,
            status: req.status,
            created_at: now,
            completed_at,
        };

        let row = self.attempts.insert(&new_attempt).await?;
        tracing::info!(attempt_id = row.id, user_id, status = %req.status, "Quiz attempt started");

        QuizAttempt::try_from(row)
    }

    /// Records answers and score, moving the attempt to `completed`.
    ///
    /// Re-completing an already completed attempt overwrites it.
    pub async fn complete_attempt(
        &self,
        attempt_id: i64,
        user_id: i64,
        req: CompleteAttemptRequest,
    ) -> AppResult<QuizAttempt> {
        if req.status.is_some_and(|s| s != AttemptStatus::Completed) {
            return Err(AppError::Validation(
                "A quiz attempt can only transition to 'completed'".to_string(),
            ));
        }
        check_score(req.score, req.total_questions)?;

        let current = self.owned_attempt(attempt_id, user_id).await?;

        if req.total_questions != current.total_questions {
            return Err(AppError::Validation(format!(
                "total_questions ({}) does not match the attempt's {} questions",
                req.total_questions, current.total_questions
            )));
        }
        check_answers(&req.answers, &current.questions_data)?;

        let completion = Completion {
            answers: serde_json::to_string(&req.answers)?,
            score: req.score,
            percentage: percentage_of(req.score, req.total_questions),
            completed_at: Utc::now(),
        };

        // questions_data is immutable after start; the owner-filtered UPDATE
        // is the only write.
        let row = self
            .attempts
            .complete(attempt_id, user_id, &completion)
            .await?
            .ok_or_else(|| AppError::NotFound(ATTEMPT_NOT_FOUND.to_string()))?;

        if current.status == AttemptStatus::Completed {
            tracing::info!(attempt_id, user_id, "Quiz attempt re-completed, previous result overwritten");
        } else {
            tracing::info!(attempt_id, user_id, score = req.score, "Quiz attempt completed");
        }

        QuizAttempt::try_from(row)
    }

    pub async fn get_attempt(&self, attempt_id: i64, user_id: i64) -> AppResult<QuizAttempt> {
        self.owned_attempt(attempt_id, user_id).await
    }

    pub async fn get_stats(&self, user_id: i64) -> AppResult<QuizStats> {
        let total = self.attempts.count_for_user(user_id).await?;
        let completed = self.attempts.completed_outcomes(user_id).await?;
        Ok(QuizStats::from_outcomes(total, &completed))
    }

    /// Most recent attempts, newest first, bundled with the user's stats.
    pub async fn get_recent(&self, user_id: i64, limit: Option<i64>) -> AppResult<RecentAttempts> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT);

        let quizzes = self
            .attempts
            .recent_for_user(user_id, limit)
            .await?
            .into_iter()
            .map(QuizAttempt::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        let stats = self.get_stats(user_id).await?;

        Ok(RecentAttempts { quizzes, stats })
    }

    /// Fetches an attempt and enforces ownership.
    ///
    /// An attempt owned by someone else is reported exactly like a missing one,
    /// so callers cannot probe for other users' attempt ids.
    async fn owned_attempt(&self, attempt_id: i64, user_id: i64) -> AppResult<QuizAttempt> {
        let row = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ATTEMPT_NOT_FOUND.to_string()))?;

        if row.user_id != user_id {
            tracing::debug!(attempt_id, user_id, "Attempt requested by non-owner");
            return Err(AppError::NotFound(ATTEMPT_NOT_FOUND.to_string()));
        }

        QuizAttempt::try_from(row)
    }
}
