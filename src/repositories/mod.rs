// src/repositories/mod.rs

pub mod attempts;
pub mod users;

pub use attempts::{AttemptRepository, Completion, NewAttempt};
pub use users::UserRepository;
