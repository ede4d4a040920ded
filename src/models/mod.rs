// src/models/mod.rs

pub mod question;
pub mod quiz_attempt;
pub mod user;
