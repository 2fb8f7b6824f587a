pub mod document;
pub mod json_file;

pub use document::DocumentStore;
pub use json_file::JsonFileStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::domain::ports::CatalogStore;
use crate::utils::error::Result;
use std::path::Path;
use std::sync::Arc;

/// Opens the backend named in configuration.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn CatalogStore>> {
    let store: Arc<dyn CatalogStore> = match config.backend {
        StorageBackend::JsonFile => Arc::new(JsonFileStore::open(&config.path).await?),
        StorageBackend::Document => Arc::new(DocumentStore::open(Path::new(&config.path))?),
    };
    tracing::info!(
        backend = store.backend_name(),
        path = %config.path,
        "Catalog store opened"
    );
    Ok(store)
}
