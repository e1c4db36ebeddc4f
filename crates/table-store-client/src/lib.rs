//! Client for a PostgREST-style remote table store.

mod client;
mod error;
mod types;

pub use client::TableStoreClient;
pub use error::StoreError;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_client(mock_server: &MockServer) -> TableStoreClient {
        TableStoreClient::new(mock_server.uri(), "test-access-key").unwrap()
    }

    fn sample_row() -> serde_json::Value {
        serde_json::json!({
            "name": "Johnathan",
            "surname": "Doeson",
            "email": "a@b.com",
            "phoneNumber": "123456789"
        })
    }

    #[tokio::test]
    async fn test_insert_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/users"))
            .and(header("apikey", "test-access-key"))
            .and(header("Authorization", "Bearer test-access-key"))
            .and(header("Prefer", "return=minimal"))
            .and(body_json(sample_row()))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.insert("users", &sample_row()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_insert_api_error_uses_store_message() {
        let mock_server = MockServer::start().await;

        let error_body = serde_json::json!({
            "code": "23505",
            "details": "Key (email)=(a@b.com) already exists.",
            "hint": null,
            "message": "duplicate key value violates unique constraint \"users_email_key\""
        });

        Mock::given(method("POST"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(409).set_body_json(&error_body))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let err = client.insert("users", &sample_row()).await.unwrap_err();

        assert_eq!(
            err.message(),
            "duplicate key value violates unique constraint \"users_email_key\""
        );
        assert_eq!(err.status(), Some(409));
        assert!(matches!(
            err,
            StoreError::Api { code: Some(ref c), .. } if c == "23505"
        ));
    }

    #[tokio::test]
    async fn test_insert_plain_text_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let err = client.insert("users", &sample_row()).await.unwrap_err();
        assert_eq!(err.message(), "upstream unavailable");
    }

    #[tokio::test]
    async fn test_insert_empty_error_body_falls_back_to_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let err = client.insert("users", &sample_row()).await.unwrap_err();
        assert_eq!(err.message(), "Unauthorized");
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_insert_unreachable_store() {
        // Nothing listens on port 9; the transport error becomes the message
        let client = TableStoreClient::new("http://127.0.0.1:9", "key").unwrap();
        let err = client.insert("users", &sample_row()).await.unwrap_err();

        assert!(matches!(err, StoreError::Http(_)));
        assert!(!err.message().is_empty());
    }

    #[tokio::test]
    async fn test_empty_base_url_fails_on_request() {
        let client = TableStoreClient::new("", "").unwrap();
        let result = client.insert("users", &sample_row()).await;
        assert!(matches!(result, Err(StoreError::Http(_))));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = TableStoreClient::new("http://store.local/", "key").unwrap();
        assert_eq!(client.base_url(), "http://store.local");
    }

    #[test]
    fn test_debug_hides_access_key() {
        let client = TableStoreClient::new("http://store.local", "super-secret").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("store.local"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_api_error_body_deserialization() {
        let json = r#"{"message": "permission denied for table users"}"#;

        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.message, "permission denied for table users");
        assert!(body.code.is_none());
        assert!(body.details.is_none());
        assert!(body.hint.is_none());
    }
}
