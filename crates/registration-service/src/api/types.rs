//! API response types.

use serde::Serialize;

/// Body of every registration response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegistrationResponse {
    /// `{"success":true}`
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// `{"success":false,"error":...}`
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serialization() {
        let json = serde_json::to_string(&RegistrationResponse::success()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn test_failure_serialization() {
        let json = serde_json::to_string(&RegistrationResponse::failure("SMTP error")).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"SMTP error"}"#);
    }
}
