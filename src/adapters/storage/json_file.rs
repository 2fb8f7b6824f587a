use crate::domain::model::StoredItem;
use crate::domain::ports::CatalogStore;
use crate::utils::error::{GroceryError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Catalog kept as a pretty-printed JSON array in a single file.
///
/// Every operation holds `lock` for its whole read-modify-write cycle, and
/// writes land in a sibling temp file that is renamed over the original.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens the catalog file, creating an empty one if it does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        if !tokio::fs::try_exists(&path).await? {
            tracing::info!("Creating empty catalog at {}", path.display());
            tokio::fs::write(&path, b"[]").await?;
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    async fn read_items(&self) -> Result<Vec<StoredItem>> {
        let data = tokio::fs::read(&self.path).await?;
        let items: Vec<StoredItem> = serde_json::from_slice(&data)?;
        Ok(items)
    }

    async fn write_items(&self, items: &[StoredItem]) -> Result<()> {
        let json = serde_json::to_vec_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        tracing::debug!("Wrote {} items ({} bytes)", items.len(), json.len());
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for JsonFileStore {
    async fn list(&self) -> Result<Vec<StoredItem>> {
        let _guard = self.lock.lock().await;
        self.read_items().await
    }

    async fn get(&self, id: &str) -> Result<Option<StoredItem>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_items().await?.into_iter().find(|i| i.id == id))
    }

    async fn insert(&self, item: StoredItem) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_items().await?;
        if items.iter().any(|i| i.id == item.id) {
            return Err(GroceryError::Conflict { id: item.id });
        }
        items.push(item);
        self.write_items(&items).await
    }

    async fn replace(&self, item: StoredItem) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_items().await?;
        let Some(slot) = items.iter_mut().find(|i| i.id == item.id) else {
            return Ok(false);
        };
        *slot = item;
        self.write_items(&items).await?;
        Ok(true)
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_items().await?;
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.write_items(&items).await?;
        Ok(true)
    }

    async fn health_check(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.read_items().await.map(|_| ())
    }

    async fn close(&self) -> Result<()> {
        // nothing held open between operations
        tracing::debug!("Closed JSON catalog {}", self.path.display());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "json_file"
    }
}
