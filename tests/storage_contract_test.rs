use grocery_route::config::{StorageBackend, StorageConfig};
use grocery_route::domain::ports::CatalogStore;
use grocery_route::{open_store, CatalogService, GroceryError, ItemDraft, SelectionRequest};
use std::sync::Arc;
use tempfile::TempDir;

fn draft(name: &str, category: &str, section: &str, aisle: Option<u32>) -> ItemDraft {
    ItemDraft {
        name: Some(name.to_string()),
        category: Some(category.to_string()),
        section: Some(section.to_string()),
        price: Some(1.99),
        aisle,
        ..Default::default()
    }
}

async fn open(backend: StorageBackend, dir: &TempDir) -> Arc<dyn CatalogStore> {
    let file = match backend {
        StorageBackend::JsonFile => "items.json",
        StorageBackend::Document => "catalog.db",
    };
    let config = StorageConfig {
        backend,
        path: dir.path().join(file).to_string_lossy().into_owned(),
    };
    open_store(&config).await.unwrap()
}

/// Same behaviour is expected from every backend.
async fn run_contract(backend: StorageBackend) {
    let dir = TempDir::new().unwrap();
    let store = open(backend, &dir).await;
    store.health_check().await.unwrap();

    let service = CatalogService::new(Arc::clone(&store), 1);

    let cheese = service
        .create(draft("Cheese", "Dairy", "Aged", Some(7)))
        .await
        .unwrap();
    let bread = service
        .create(draft("Bread", "Bakery", "Loaves", None))
        .await
        .unwrap();
    let milk = service
        .create(draft("Milk", "Dairy", "Fresh", Some(7)))
        .await
        .unwrap();

    assert_eq!(bread.aisle, Some(1), "{:?}: write-time default", backend);
    assert_eq!(service.list_all().await.unwrap().len(), 3);
    assert_eq!(service.get(&milk.id).await.unwrap().name, "Milk");

    let request = SelectionRequest::new([
        milk.id.clone(),
        "unknown".to_string(),
        bread.id.clone(),
        cheese.id.clone(),
        milk.id.clone(),
    ]);
    let route = service.optimize_route(&request).await.unwrap();
    let names: Vec<&str> = route.iter().map(|i| i.name.as_str()).collect();
    // aisle 1 first, then the aisle-7 pair in catalog (insertion) order
    assert_eq!(names, vec!["Bread", "Cheese", "Milk"], "{:?}", backend);

    let filtered = service.list_filtered(Some("Dairy"), None).await.unwrap();
    assert_eq!(filtered.items.len(), 2);
    assert_eq!(filtered.sections, vec!["Dairy", "Bakery"]);
    assert_eq!(filtered.subsections, vec!["Aged", "Fresh"]);

    let moved = service
        .update(&bread.id, draft("Sourdough", "Bakery", "Loaves", Some(9)))
        .await
        .unwrap();
    assert_eq!(moved.id, bread.id);
    let route = service.optimize_route(&request).await.unwrap();
    assert_eq!(route.last().unwrap().name, "Sourdough");

    service.delete(&cheese.id).await.unwrap();
    assert!(matches!(
        service.delete(&cheese.id).await,
        Err(GroceryError::NotFound { .. })
    ));

    store.close().await.unwrap();

    // state survives reopening
    let reopened = open(backend, &dir).await;
    let names: Vec<String> = reopened
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["Sourdough", "Milk"]);
}

#[tokio::test]
async fn test_json_file_backend_contract() {
    run_contract(StorageBackend::JsonFile).await;
}

#[tokio::test]
async fn test_document_backend_contract() {
    run_contract(StorageBackend::Document).await;
}
