// tests/quiz_tests.rs

mod common;

use common::{login_new_user, spawn_app};
use serde_json::{Value, json};

fn questions(n: usize) -> Value {
    let items: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "question": format!("Question {}?", i + 1),
                "options": ["A) one", "B) two", "C) three", "D) four"]
            })
        })
        .collect();
    Value::Array(items)
}

async fn start(client: &reqwest::Client, address: &str, token: &str, topic: &str, n: usize) -> Value {
    let res = client
        .post(format!("{}/api/quiz/start", address))
        .bearer_auth(token)
        .json(&json!({
            "topic": topic,
            "total_questions": n,
            "questions_data": questions(n)
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(res.status().as_u16(), 201);
    res.json().await.unwrap()
}

async fn complete(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    id: i64,
    body: Value,
) -> reqwest::Response {
    client
        .put(format!("{}/api/quiz/{}/complete", address, id))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn start_creates_incomplete_attempt() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login_new_user(&client, &address).await;

    let attempt = start(&client, &address, &token, "  Rust basics  ", 3).await;

    assert_eq!(attempt["topic"], "Rust basics");
    assert_eq!(attempt["status"], "incomplete");
    assert_eq!(attempt["total_questions"], 3);
    assert_eq!(attempt["questions_data"].as_array().unwrap().len(), 3);
    assert!(attempt["score"].is_null());
    assert!(attempt["percentage"].is_null());
    assert!(attempt["completed_at"].is_null());

    let id = attempt["id"].as_i64().unwrap();
    let res = client
        .get(format!("{}/api/quiz/{}", address, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched["id"], id);
}

#[tokio::test]
async fn start_rejects_inconsistent_payloads() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login_new_user(&client, &address).await;

    for payload in [
        // count mismatch
        json!({ "topic": "Math", "total_questions": 5, "questions_data": questions(3) }),
        // blank topic
        json!({ "topic": " ", "total_questions": 1, "questions_data": questions(1) }),
        // no questions
        json!({ "topic": "Math", "total_questions": 0, "questions_data": [] }),
        // score on an incomplete attempt
        json!({ "topic": "Math", "total_questions": 2, "questions_data": questions(2), "score": 1 }),
        // completed without a score
        json!({ "topic": "Math", "total_questions": 2, "questions_data": questions(2), "status": "completed" }),
    ] {
        let res = client
            .post(format!("{}/api/quiz/start", address))
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 400, "payload: {}", payload);
    }
}

#[tokio::test]
async fn start_accepts_pre_scored_attempt() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login_new_user(&client, &address).await;

    let res = client
        .post(format!("{}/api/quiz/start", address))
        .bearer_auth(&token)
        .json(&json!({
            "topic": "History",
            "total_questions": 3,
            "questions_data": questions(3),
            "status": "completed",
            "score": 2
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 201);
    let attempt: Value = res.json().await.unwrap();
    assert_eq!(attempt["status"], "completed");
    assert_eq!(attempt["percentage"], 66.67);
    assert!(attempt["completed_at"].is_string());
}

#[tokio::test]
async fn complete_scores_and_last_write_wins() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login_new_user(&client, &address).await;
    let id = start(&client, &address, &token, "Geography", 4).await["id"]
        .as_i64()
        .unwrap();

    let res = complete(
        &client,
        &address,
        &token,
        id,
        json!({
            "answers": [
                { "question_index": 0, "selected_option": "B) two" },
                { "question_index": 1, "selected_option": null }
            ],
            "score": 3,
            "total_questions": 4
        }),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);
    let attempt: Value = res.json().await.unwrap();
    assert_eq!(attempt["status"], "completed");
    assert_eq!(attempt["score"], 3);
    assert_eq!(attempt["percentage"], 75.0);
    assert_eq!(attempt["answers"].as_array().unwrap().len(), 2);
    assert!(attempt["completed_at"].is_string());

    let res = complete(
        &client,
        &address,
        &token,
        id,
        json!({ "answers": [], "score": 1, "total_questions": 4, "status": "completed" }),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);
    let attempt: Value = res.json().await.unwrap();
    assert_eq!(attempt["score"], 1);
    assert_eq!(attempt["percentage"], 25.0);
}

#[tokio::test]
async fn complete_rejects_invalid_submissions() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login_new_user(&client, &address).await;
    let id = start(&client, &address, &token, "Science", 2).await["id"]
        .as_i64()
        .unwrap();

    for body in [
        json!({ "answers": [], "score": 3, "total_questions": 2 }),
        json!({ "answers": [], "score": -1, "total_questions": 2 }),
        json!({ "answers": [], "score": 1, "total_questions": 5 }),
        json!({ "answers": [], "score": 1, "total_questions": 2, "status": "incomplete" }),
        json!({ "answers": [{ "question_index": 7, "selected_option": "A) one" }], "score": 1, "total_questions": 2 }),
        json!({ "answers": [{ "question_index": 0, "selected_option": "Z) nope" }], "score": 1, "total_questions": 2 }),
    ] {
        let res = complete(&client, &address, &token, id, body.clone()).await;
        assert_eq!(res.status().as_u16(), 400, "body: {}", body);
    }

    // Nothing was written by the rejected submissions.
    let res = client
        .get(format!("{}/api/quiz/{}", address, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let attempt: Value = res.json().await.unwrap();
    assert_eq!(attempt["status"], "incomplete");
}

#[tokio::test]
async fn attempts_are_private_to_their_owner() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let owner = login_new_user(&client, &address).await;
    let intruder = login_new_user(&client, &address).await;
    let id = start(&client, &address, &owner, "Secrets", 1).await["id"]
        .as_i64()
        .unwrap();

    let res = client
        .get(format!("{}/api/quiz/{}", address, id))
        .bearer_auth(&intruder)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);

    let res = complete(
        &client,
        &address,
        &intruder,
        id,
        json!({ "answers": [], "score": 1, "total_questions": 1 }),
    )
    .await;
    assert_eq!(res.status().as_u16(), 404);

    let res = client
        .get(format!("{}/api/quiz/999999", address))
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Quiz attempt not found");
}

#[tokio::test]
async fn stats_and_recent_reflect_completed_attempts() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login_new_user(&client, &address).await;

    let mut ids = Vec::new();
    for (topic, score) in [("First", 8), ("Second", 10), ("Third", 6)] {
        let id = start(&client, &address, &token, topic, 10).await["id"]
            .as_i64()
            .unwrap();
        let res = complete(
            &client,
            &address,
            &token,
            id,
            json!({ "answers": [], "score": score, "total_questions": 10 }),
        )
        .await;
        assert_eq!(res.status().as_u16(), 200);
        ids.push(id);
    }
    let pending = start(&client, &address, &token, "Pending", 2).await["id"]
        .as_i64()
        .unwrap();

    let res = client
        .get(format!("{}/api/quiz/stats", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let stats: Value = res.json().await.unwrap();
    assert_eq!(stats["total_quizzes"], 4);
    assert_eq!(stats["completed_quizzes"], 3);
    assert_eq!(stats["incomplete_quizzes"], 1);
    assert_eq!(stats["average_score"], 8.0);
    assert_eq!(stats["highest_score"], 10);
    assert_eq!(stats["lowest_score"], 6);
    assert_eq!(stats["average_percentage"], 80.0);

    let res = client
        .get(format!("{}/api/quiz/recent?limit=2", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    let quizzes = body["quizzes"].as_array().unwrap();
    assert_eq!(quizzes.len(), 2);
    assert_eq!(quizzes[0]["id"], pending);
    assert_eq!(quizzes[1]["id"], ids[2]);
    assert_eq!(body["stats"]["completed_quizzes"], 3);
}

#[tokio::test]
async fn stats_are_zero_for_a_new_user() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login_new_user(&client, &address).await;

    let res = client
        .get(format!("{}/api/quiz/recent", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert!(body["quizzes"].as_array().unwrap().is_empty());
    assert_eq!(body["stats"]["total_quizzes"], 0);
    assert_eq!(body["stats"]["average_score"], 0.0);
    assert_eq!(body["stats"]["highest_score"], 0);
}

#[tokio::test]
async fn quiz_routes_require_authentication() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/quiz/stats", address))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);

    let res = client
        .post(format!("{}/api/quiz/start", address))
        .json(&json!({ "topic": "Math", "total_questions": 1, "questions_data": questions(1) }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);
}
