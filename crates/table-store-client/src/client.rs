//! Table store HTTP client.

use crate::error::StoreError;
use crate::types::ApiErrorBody;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Path prefix of the REST interface on the store host.
const REST_PREFIX: &str = "/rest/v1";

/// Client for a PostgREST-style table store.
///
/// The access key is stored using `SecretString` so it never shows up in
/// debug output.
#[derive(Clone)]
pub struct TableStoreClient {
    client: Client,
    base_url: String,
    access_key: SecretString,
}

impl std::fmt::Debug for TableStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableStoreClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TableStoreClient {
    /// Create a new table store client.
    ///
    /// Neither value is validated here; an unusable URL surfaces as an error
    /// on the first request.
    pub fn new(
        base_url: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key: SecretString::new(access_key.into()),
        })
    }

    /// Base URL of the store.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Insert one row into `table`.
    #[instrument(skip(self, row))]
    pub async fn insert<T>(&self, table: &str, row: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let key = self.access_key.expose_secret();

        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", key.as_str())
            .header("Authorization", format!("Bearer {}", key))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(%status, "Row inserted");
            return Ok(());
        }

        Err(Self::extract_error(response).await)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}{}/{}", self.base_url, REST_PREFIX, table)
    }

    /// Turn a failed response into a `StoreError`.
    async fn extract_error(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let (code, message) = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(err) => (err.code, err.message),
            Err(_) if !body.trim().is_empty() => (None, body),
            Err(_) => (
                None,
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            ),
        };

        warn!(%status, ?code, %message, "Store request failed");

        StoreError::Api {
            status: status.as_u16(),
            code,
            message,
        }
    }
}
