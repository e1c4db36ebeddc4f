//! Error types for the registration service.

use crate::api::RegistrationResponse;
use crate::mailer::MailError;
use crate::registration::ValidationFailure;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use table_store_client::StoreError;
use thiserror::Error;

/// Every way a registration request can end without success.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    #[error("{0}")]
    Store(String),

    #[error("SMTP error")]
    Smtp,
}

impl RegistrationError {
    /// Status code and client-facing message.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            // Parser details stay in the logs
            RegistrationError::MalformedBody(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
            RegistrationError::MethodNotAllowed
            | RegistrationError::Validation(_)
            | RegistrationError::Store(_)
            | RegistrationError::Smtp => (StatusCode::BAD_REQUEST, self.to_string()),
        }
    }
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(RegistrationResponse::failure(message))).into_response()
    }
}

impl From<StoreError> for RegistrationError {
    fn from(e: StoreError) -> Self {
        RegistrationError::Store(e.message())
    }
}

impl From<MailError> for RegistrationError {
    fn from(_: MailError) -> Self {
        RegistrationError::Smtp
    }
}
