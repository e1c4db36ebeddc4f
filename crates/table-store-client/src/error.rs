//! Table store client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },
}

impl StoreError {
    /// Human-readable message reported by the store, or the transport error text.
    pub fn message(&self) -> String {
        match self {
            StoreError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status returned by the store, if the request reached it.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Api { status, .. } => Some(*status),
            StoreError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}
