// src/repositories/attempts.rs

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{
    error::AppResult,
    models::quiz_attempt::{AttemptRow, AttemptStatus},
};

const ATTEMPT_COLUMNS: &str = "id, user_id, topic, total_questions, questions_data, answers, \
     score, percentage, status, created_at, completed_at";

/// Values for a fresh `quiz_attempts` row; JSON columns are pre-serialized.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub user_id: i64,
    pub topic: String,
    pub total_questions: i64,
    pub questions_data: String,
    pub answers: Option<String>,
    pub score: Option<i64>,
    pub percentage: Option<f64>,
    pub status: AttemptStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Values written when an attempt is (re-)completed.
#[derive(Debug, Clone)]
pub struct Completion {
    pub answers: String,
    pub score: i64,
    pub percentage: f64,
    pub completed_at: DateTime<Utc>,
}

/// Attempt store backed by the `quiz_attempts` table.
#[derive(Clone)]
pub struct AttemptRepository {
    pool: SqlitePool,
}

impl AttemptRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, attempt: &NewAttempt) -> AppResult<AttemptRow> {
        let row = sqlx::query_as::<_, AttemptRow>(&format!(
            r#"
            INSERT INTO quiz_attempts (
                user_id, topic, total_questions, questions_data, answers,
                score, percentage, status, created_at, completed_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {ATTEMPT_COLUMNS}
            "#
        ))
        .bind(attempt.user_id)
        .bind(&attempt.topic)
        .bind(attempt.total_questions)
        .bind(&attempt.questions_data)
        .bind(&attempt.answers)
        .bind(attempt.score)
        .bind(attempt.percentage)
        .bind(attempt.status.as_str())
        .bind(attempt.created_at)
        .bind(attempt.completed_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Looks an attempt up by id only. Ownership is checked by the caller.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<AttemptRow>> {
        let row = sqlx::query_as::<_, AttemptRow>(&format!(
            "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Overwrites the outcome of an attempt owned by `user_id` in a single
    /// statement. `None` when no such attempt exists for that owner.
    pub async fn complete(
        &self,
        id: i64,
        user_id: i64,
        completion: &Completion,
    ) -> AppResult<Option<AttemptRow>> {
        let row = sqlx::query_as::<_, AttemptRow>(&format!(
            r#"
            UPDATE quiz_attempts
            SET answers = ?, score = ?, percentage = ?, status = ?, completed_at = ?
            WHERE id = ? AND user_id = ?
            RETURNING {ATTEMPT_COLUMNS}
            "#
        ))
        .bind(&completion.answers)
        .bind(completion.score)
        .bind(completion.percentage)
        .bind(AttemptStatus::Completed.as_str())
        .bind(completion.completed_at)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn count_for_user(&self, user_id: i64) -> AppResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM quiz_attempts WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// `(score, percentage)` of every completed attempt owned by `user_id`.
    pub async fn completed_outcomes(&self, user_id: i64) -> AppResult<Vec<(i64, f64)>> {
        let rows: Vec<(Option<i64>, Option<f64>)> = sqlx::query_as(
            r#"
            SELECT score, percentage
            FROM quiz_attempts
            WHERE user_id = ? AND status = ?
            "#,
        )
        .bind(user_id)
        .bind(AttemptStatus::Completed.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(score, pct)| Some((score?, pct?)))
            .collect())
    }

    /// Newest first; `id` breaks ties between identical timestamps.
    pub async fn recent_for_user(&self, user_id: i64, limit: i64) -> AppResult<Vec<AttemptRow>> {
        let rows = sqlx::query_as::<_, AttemptRow>(&format!(
            r#"
            SELECT {ATTEMPT_COLUMNS}
            FROM quiz_attempts
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
