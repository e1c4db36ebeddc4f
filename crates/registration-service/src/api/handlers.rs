//! HTTP request handlers.

use super::types::RegistrationResponse;
use super::AppState;
use crate::error::RegistrationError;
use crate::mailer::Email;
use crate::registration::validate_registration;
use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::Method,
    Json,
};
use tracing::{error, info, warn};

/// Register a new user: validate, store, then send the confirmation email.
///
/// Stops at the first failing step. Once the row is stored it stays stored,
/// even if the email cannot be sent. The body is only read after the method
/// check and has no size limit.
pub async fn register(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<RegistrationResponse>, RegistrationError> {
    if request.method() != Method::POST {
        return Err(RegistrationError::MethodNotAllowed);
    }

    let body = to_bytes(request.into_body(), usize::MAX).await.map_err(|e| {
        error!(error = %e, "Failed to read request body");
        RegistrationError::MalformedBody(e.to_string())
    })?;

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Request body is not valid JSON");
        RegistrationError::MalformedBody(e.to_string())
    })?;

    let record = validate_registration(&payload).map_err(|failure| {
        warn!(errors = ?failure.errors, "Registration rejected by validation");
        failure
    })?;

    info!(email = %record.email, "Registration request received");

    state.store.insert(&record).await.map_err(|e| {
        warn!(
            email = %record.email,
            status = ?e.status(),
            error = %e,
            "Failed to store registration"
        );
        e
    })?;

    let email = Email::confirmation(record.email.as_str());
    if let Err(e) = state.mailer.send(&email).await {
        // The row is already stored at this point
        error!(email = %record.email, error = %e, "Failed to send confirmation email");
        return Err(e.into());
    }

    info!(email = %record.email, "Registration completed");

    Ok(Json(RegistrationResponse::success()))
}
