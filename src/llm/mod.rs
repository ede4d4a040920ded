// src/llm/mod.rs

pub mod gemini;

use async_trait::async_trait;

use crate::error::AppResult;

pub use gemini::GeminiClient;

/// Text-generation backend used to draft quiz questions.
///
/// Implementations perform exactly one upstream call per invocation and
/// report any transport or format failure as `AppError::Generation`.
#[async_trait]
pub trait QuestionModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}
