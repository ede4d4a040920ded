use std::sync::Arc;

use crate::{
    config::Config,
    llm::QuestionModel,
    repositories::{AttemptRepository, UserRepository},
    services::{AuthService, QuestionService, QuizService},
};
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub auth: AuthService,
    pub quiz: QuizService,
    pub questions: QuestionService,
}

impl AppState {
    /// Wires repositories and services around an already-migrated pool.
    pub fn new(pool: SqlitePool, config: Config, model: Arc<dyn QuestionModel>) -> Self {
        let auth = AuthService::new(
            UserRepository::new(pool.clone()),
            config.jwt_secret.clone(),
            config.jwt_expiration,
        );
        let quiz = QuizService::new(AttemptRepository::new(pool.clone()));
        let questions = QuestionService::new(model);

        Self {
            pool,
            config,
            auth,
            quiz,
            questions,
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for QuizService {
    fn from_ref(state: &AppState) -> Self {
        state.quiz.clone()
    }
}

impl FromRef<AppState> for QuestionService {
    fn from_ref(state: &AppState) -> Self {
        state.questions.clone()
    }
}
