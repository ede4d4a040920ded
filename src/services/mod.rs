// src/services/mod.rs

pub mod auth;
pub mod questions;
pub mod quiz;

pub use auth::AuthService;
pub use questions::QuestionService;
pub use quiz::QuizService;
