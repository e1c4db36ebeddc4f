//! Common test utilities for integration tests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use registration_service::{
    api::{create_router, AppState},
    Email, MailError, Mailer,
};
use std::sync::{Arc, Mutex};
use table_store_client::TableStoreClient;
use tower::ServiceExt;
use wiremock::MockServer;

/// Mailer that records every email and optionally fails.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Emails handed to `send`, including failed attempts.
    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            Err(MailError::Unavailable)
        } else {
            Ok(())
        }
    }
}

/// Build the router against a mock store server.
pub fn test_app(mock_server: &MockServer, mailer: Arc<RecordingMailer>) -> Router {
    let store = TableStoreClient::new(mock_server.uri(), "test-access-key").unwrap();
    create_router(AppState::new(Arc::new(store), mailer))
}

/// Send one request and decode the JSON response.
pub async fn send(app: Router, method: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri("/functions/v1/register")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    assert_eq!(response.headers()["content-type"], "application/json");

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}
