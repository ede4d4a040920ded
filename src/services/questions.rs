// src/services/questions.rs

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::{
    config::MAX_GENERATED_QUESTIONS,
    error::{AppError, AppResult},
    llm::QuestionModel,
    models::question::QuestionSet,
};

/// Matches the body of a Markdown code fence, with or without a language tag.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z]*\s*\n?(.*?)```").expect("code fence regex is valid")
});

/// Turns a topic into a validated multiple-choice question set.
#[derive(Clone)]
pub struct QuestionService {
    model: Arc<dyn QuestionModel>,
}

impl QuestionService {
    pub fn new(model: Arc<dyn QuestionModel>) -> Self {
        Self { model }
    }

    pub async fn generate_questions(&self, topic: &str, count: i64) -> AppResult<QuestionSet> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AppError::Validation("Topic cannot be empty".to_string()));
        }
        if !(1..=i64::from(MAX_GENERATED_QUESTIONS)).contains(&count) {
            return Err(AppError::Validation(format!(
                "Number of questions must be between 1 and {}",
                MAX_GENERATED_QUESTIONS
            )));
        }

        let prompt = build_prompt(topic, count);
        tracing::info!(topic = %topic, count, "Requesting questions from model");

        let raw = self.model.generate(&prompt).await?;
        let set = parse_question_set(&raw)?;

        tracing::debug!(generated = set.len(), "Model returned question set");
        Ok(set)
    }
}

/// Prompt asking the model for `count` four-option questions as bare JSON.
pub fn build_prompt(topic: &str, count: i64) -> String {
    format!(
        r#"Generate {count} multiple choice questions about {topic}.
Each question should have 4 options (A, B, C, D).
Format the response as valid JSON with this exact structure:
{{
  "questions": [
    {{
      "question": "Question text here?",
      "options": ["Option A", "Option B", "Option C", "Option D"]
    }}
  ]
}}

Make sure the questions are educational and the options are plausible but only one is correct.
Respond with the JSON object only.
Topic: {topic}
Number of questions: {count}"#
    )
}

/// Parses model output into a question set, tolerating Markdown fences and
/// prose around the JSON object.
pub fn parse_question_set(raw: &str) -> AppResult<QuestionSet> {
    let set = match serde_json::from_str::<QuestionSet>(raw) {
        Ok(set) => set,
        Err(_) => {
            let cleaned = extract_json_object(raw).ok_or_else(|| {
                AppError::Generation("Model response did not contain a JSON object".to_string())
            })?;
            serde_json::from_str::<QuestionSet>(cleaned).map_err(|e| {
                AppError::Generation(format!("Model response is not a valid question set: {}", e))
            })?
        }
    };

    set.check().map_err(|e| match e {
        AppError::Validation(msg) => AppError::Generation(msg),
        other => other,
    })?;

    Ok(set)
}

/// Strips a code fence if present, then slices from the first `{` to the last `}`.
fn extract_json_object(raw: &str) -> Option<&str> {
    let body = CODE_FENCE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or(raw, |m| m.as_str());

    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (start < end).then(|| &body[start..=end])
}
