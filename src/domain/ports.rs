use crate::domain::model::{Principal, StoredItem};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistence backend for the catalog. Implementations must keep
/// insertion order stable for `list`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list(&self) -> Result<Vec<StoredItem>>;
    async fn get(&self, id: &str) -> Result<Option<StoredItem>>;
    async fn insert(&self, item: StoredItem) -> Result<()>;
    /// Returns `false` when no item with that id exists.
    async fn replace(&self, item: StoredItem) -> Result<bool>;
    /// Returns `false` when no item with that id exists.
    async fn remove(&self, id: &str) -> Result<bool>;
    async fn health_check(&self) -> Result<()>;
    async fn close(&self) -> Result<()>;
    fn backend_name(&self) -> &'static str;
}

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, login_id: &str, password: &str) -> Result<Principal>;
}
