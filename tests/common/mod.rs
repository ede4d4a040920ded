// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use quizgen_backend::{
    config::Config,
    db,
    error::{AppError, AppResult},
    llm::QuestionModel,
    routes,
    state::AppState,
};
use serde_json::{Value, json};
use sqlx::SqlitePool;

pub const PASSWORD: &str = "password123";

/// Model stub that answers every prompt with the same canned text.
pub struct CannedModel(pub Result<String, String>);

#[async_trait]
impl QuestionModel for CannedModel {
    async fn generate(&self, _prompt: &str) -> AppResult<String> {
        self.0.clone().map_err(AppError::Generation)
    }
}

pub fn canned_questions() -> String {
    let body = json!({
        "questions": [
            {"question": "What is 2+2?", "options": ["A) 3", "B) 4", "C) 5", "D) 6"]},
            {"question": "Capital of France?", "options": ["A) Paris", "B) Rome", "C) Madrid", "D) Berlin"]}
        ]
    });
    format!("Sure! Here you go:\n```json\n{}\n```", body)
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        gemini_api_key: "test-key".to_string(),
        gemini_model: "test-model".to_string(),
        gemini_base_url: "http://127.0.0.1:9".to_string(),
        server_port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
    }
}

/// Spawns the app on a random port backed by a fresh in-memory database.
/// Returns the base URL (e.g., "http://127.0.0.1:12345") and the pool, so
/// tests can adjust rows the API does not expose.
pub async fn spawn_app_with_pool(model: CannedModel) -> (String, SqlitePool) {
    let config = test_config();

    // A single connection keeps the whole in-memory database alive.
    let pool = db::connect(&config.database_url, 1)
        .await
        .expect("Failed to open in-memory database");
    db::migrate(&pool).await.expect("Failed to migrate database");

    let state = AppState::new(pool.clone(), config, Arc::new(model));
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

pub async fn spawn_app_with(model: CannedModel) -> String {
    spawn_app_with_pool(model).await.0
}

pub async fn spawn_app() -> String {
    spawn_app_with(CannedModel(Ok(canned_questions()))).await
}

pub fn unique_name() -> String {
    format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8])
}

pub async fn register(client: &reqwest::Client, address: &str, username: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/auth/register", address))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": PASSWORD
        }))
        .send()
        .await
        .expect("Failed to execute request")
}

/// Registers a fresh user and returns a bearer token for it.
pub async fn login_new_user(client: &reqwest::Client, address: &str) -> String {
    let username = unique_name();
    let res = register(client, address, &username).await;
    assert_eq!(res.status().as_u16(), 201);

    let res = client
        .post(format!("{}/api/auth/login", address))
        .json(&json!({ "username": username, "password": PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(res.status().as_u16(), 200);

    let body: Value = res.json().await.unwrap();
    body["access_token"].as_str().unwrap().to_string()
}
