use crate::domain::model::StoredItem;
use crate::domain::ports::CatalogStore;
use crate::utils::error::{GroceryError, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id  TEXT NOT NULL UNIQUE,
    doc TEXT NOT NULL
);
"#;

/// Document-style catalog: one JSON document per row in SQLite.
///
/// The connection is opened explicitly at startup and released by
/// [`CatalogStore::close`]; operations after close fail with
/// [`GroceryError::StoreUnavailable`].
#[derive(Clone)]
pub struct DocumentStore {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl DocumentStore {
    /// Open a file-backed store.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store.
    pub fn memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        if let Err(e) = conn.execute_batch("PRAGMA journal_mode = WAL;") {
            tracing::debug!("WAL journal mode not enabled: {}", e);
        }
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| GroceryError::StoreUnavailable {
                message: "connection lock poisoned".to_string(),
            })?;
            match guard.as_ref() {
                Some(conn) => f(conn),
                None => Err(GroceryError::StoreUnavailable {
                    message: "document store is closed".to_string(),
                }),
            }
        })
        .await
        .map_err(|e| GroceryError::StoreUnavailable {
            message: format!("storage task failed: {}", e),
        })?
    }
}

fn decode(doc: &str) -> Result<StoredItem> {
    Ok(serde_json::from_str(doc)?)
}

#[async_trait]
impl CatalogStore for DocumentStore {
    async fn list(&self) -> Result<Vec<StoredItem>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT doc FROM items ORDER BY seq")?;
            let docs = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            docs.iter().map(|doc| decode(doc)).collect()
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Option<StoredItem>> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let doc: Option<String> = conn
                .query_row("SELECT doc FROM items WHERE id = ?1", [&id], |row| row.get(0))
                .optional()?;
            doc.as_deref().map(decode).transpose()
        })
        .await
    }

    async fn insert(&self, item: StoredItem) -> Result<()> {
        let doc = serde_json::to_string(&item)?;
        self.with_conn(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO items (id, doc) VALUES (?1, ?2) ON CONFLICT(id) DO NOTHING",
                params![item.id, doc],
            )?;
            if inserted == 0 {
                return Err(GroceryError::Conflict { id: item.id });
            }
            Ok(())
        })
        .await
    }

    async fn replace(&self, item: StoredItem) -> Result<bool> {
        let doc = serde_json::to_string(&item)?;
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE items SET doc = ?2 WHERE id = ?1",
                params![item.id, doc],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let removed = conn.execute("DELETE FROM items WHERE id = ?1", [&id])?;
            Ok(removed > 0)
        })
        .await
    }

    async fn health_check(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| GroceryError::StoreUnavailable {
                message: "connection lock poisoned".to_string(),
            })?;
            if let Some(conn) = guard.take() {
                conn.close().map_err(|(_, e)| GroceryError::DatabaseError(e))?;
                tracing::info!("Document store connection closed");
            }
            Ok(())
        })
        .await
        .map_err(|e| GroceryError::StoreUnavailable {
            message: format!("storage task failed: {}", e),
        })?
    }

    fn backend_name(&self) -> &'static str {
        "document"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn item(id: &str, aisle: Option<u32>) -> StoredItem {
        StoredItem {
            id: id.to_string(),
            name: format!("Item {}", id),
            price: 3.0,
            aisle,
            section: "Frozen".to_string(),
            subsection: "Desserts".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = DocumentStore::memory().unwrap();
        for id in ["c", "a", "b"] {
            store.insert(item(id, Some(1))).await.unwrap();
        }
        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_crud() {
        let store = DocumentStore::memory().unwrap();
        store.insert(item("a", None)).await.unwrap();
        assert!(matches!(
            store.insert(item("a", Some(2))).await,
            Err(GroceryError::Conflict { .. })
        ));

        assert_eq!(store.get("a").await.unwrap().unwrap().aisle, None);
        assert!(store.get("missing").await.unwrap().is_none());

        assert!(store.replace(item("a", Some(8))).await.unwrap());
        assert_eq!(store.get("a").await.unwrap().unwrap().aisle, Some(8));
        assert!(!store.replace(item("missing", Some(1))).await.unwrap());

        assert!(store.remove("a").await.unwrap());
        assert!(!store.remove("a").await.unwrap());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.db");

        let store = DocumentStore::open(&path).unwrap();
        store.insert(item("x", Some(4))).await.unwrap();
        store.close().await.unwrap();

        let reopened = DocumentStore::open(&path).unwrap();
        let items = reopened.list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "x");
    }

    async fn journal_mode(store: &DocumentStore) -> String {
        store
            .with_conn(|conn| {
                Ok(conn.query_row("PRAGMA journal_mode", [], |row| row.get::<_, String>(0))?)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_journal_mode_setup() {
        let dir = TempDir::new().unwrap();
        let on_disk = DocumentStore::open(&dir.path().join("wal.db")).unwrap();
        assert_eq!(journal_mode(&on_disk).await, "wal");

        // in-memory databases cannot switch to WAL; opening still succeeds
        let in_memory = DocumentStore::memory().unwrap();
        assert_eq!(journal_mode(&in_memory).await, "memory");
        in_memory.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_operations_fail_after_close() {
        let store = DocumentStore::memory().unwrap();
        store.health_check().await.unwrap();
        store.close().await.unwrap();
        // closing twice is harmless
        store.close().await.unwrap();

        let err = store.list().await.unwrap_err();
        assert!(matches!(err, GroceryError::StoreUnavailable { .. }));
        assert_eq!(err.status_code(), 503);
        assert!(store.health_check().await.is_err());
    }
}
