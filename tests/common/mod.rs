#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{body::MessageBody, dev::ServiceResponse, test};
use chrono::Duration;
use serde_json::json;
use todo_gate::auth::password::MIN_HASH_COST;
use todo_gate::auth::{AuthResponse, TokenIssuer};
use todo_gate::state::AppState;
use todo_gate::store::InMemoryStore;

pub const SECRET: &str = "integration-test-signing-secret";

pub fn test_tokens() -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(SECRET, Duration::hours(1)).expect("valid test secret"))
}

/// Fresh in-memory state. bcrypt runs at its minimum cost to keep tests fast.
pub fn test_state() -> AppState {
    let store = Arc::new(InMemoryStore::new());
    AppState::new(store.clone(), store, test_tokens(), MIN_HASH_COST)
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {}", token),
    )
}

/// Registers a user through the HTTP API and returns the issued token.
pub async fn register_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
) -> Result<String, String> {
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;

    if !status.is_success() {
        return Err(format!(
            "Failed to register user. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    let auth: AuthResponse = serde_json::from_slice(&body)
        .map_err(|e| format!("Failed to parse registration response: {}", e))?;
    Ok(auth.token)
}
