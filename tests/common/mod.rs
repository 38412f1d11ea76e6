#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, App};
use serde_json::{json, Value};

use taskminder::routes::{self, AppState};
use taskminder::store::MemoryStore;

pub const TEST_SECRET: &str = "integration_test_secret";

pub fn test_state() -> AppState {
    AppState::new(Arc::new(MemoryStore::new()), TEST_SECRET, 4)
}

pub async fn init_app(
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(routes::config(test_state())),
    )
    .await
}

/// Sends a request and returns the status with the parsed JSON body.
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: test::TestRequest,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "response body is not JSON (status {}): {:?}",
            status,
            String::from_utf8_lossy(&body)
        )
    });
    (status, json)
}

pub fn authed(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
}

/// Registers `email` and returns the issued token.
pub async fn register(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> String {
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration failed: {}", body);
    body["data"]["token"]
        .as_str()
        .expect("token missing from registration response")
        .to_string()
}

pub fn task_payload(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Semi-skimmed",
        "category_id": 1,
        "due_date": "2025-01-01",
        "priority": "Low",
        "is_completed": false,
        "reminder_minutes_before": 30
    })
}

/// Creates a task and returns its id.
pub async fn create_task(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    token: &str,
    payload: Value,
) -> i64 {
    let (status, body) = send(
        app,
        authed(test::TestRequest::post().uri("/tasks"), token).set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "task creation failed: {}", body);
    body["data"]["id"].as_i64().expect("task id missing")
}
