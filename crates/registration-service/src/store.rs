//! Persistence seam for validated registrations.

use crate::registration::RegistrationRecord;
use async_trait::async_trait;
use table_store_client::{StoreError, TableStoreClient};

/// Table that receives one row per registration.
pub const USERS_TABLE: &str = "users";

/// Where validated registrations are written.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Insert the record as a new row. No deduplication.
    async fn insert(&self, record: &RegistrationRecord) -> Result<(), StoreError>;
}

#[async_trait]
impl RegistrationStore for TableStoreClient {
    async fn insert(&self, record: &RegistrationRecord) -> Result<(), StoreError> {
        TableStoreClient::insert(self, USERS_TABLE, record).await
    }
}
