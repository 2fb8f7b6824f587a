use crate::core::route;
use crate::domain::model::{ApiItem, FilteredCatalog, ItemDraft, SelectionRequest, StoredItem};
use crate::domain::ports::CatalogStore;
use crate::utils::error::{GroceryError, Result};
use std::sync::Arc;

pub const DEFAULT_AISLE: u32 = 1;

/// Backend-agnostic catalog operations used by the HTTP layer.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    default_aisle: u32,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, default_aisle: u32) -> Self {
        Self {
            store,
            default_aisle,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn list_all(&self) -> Result<Vec<ApiItem>> {
        let items = self.store.list().await?;
        tracing::debug!("Listing {} catalog items", items.len());
        Ok(items.iter().map(ApiItem::from).collect())
    }

    /// Items narrowed by section (and subsection within it), plus the
    /// dropdown lists, which always come from the whole catalog.
    pub async fn list_filtered(
        &self,
        section: Option<&str>,
        subsection: Option<&str>,
    ) -> Result<FilteredCatalog> {
        let all = self.store.list().await?;
        let section = section.filter(|s| !s.is_empty());
        let subsection = subsection.filter(|s| !s.is_empty());

        let items = all
            .iter()
            .filter(|item| match section {
                Some(sec) => {
                    item.section == sec && subsection.map_or(true, |sub| item.subsection == sub)
                }
                None => true,
            })
            .map(ApiItem::from)
            .collect();

        let sections = distinct(all.iter().map(|item| item.section.as_str()));
        let subsections = match section {
            Some(sec) => distinct(
                all.iter()
                    .filter(|item| item.section == sec)
                    .map(|item| item.subsection.as_str()),
            ),
            None => Vec::new(),
        };

        Ok(FilteredCatalog {
            items,
            sections,
            subsections,
        })
    }

    pub async fn get(&self, id: &str) -> Result<ApiItem> {
        self.store
            .get(id)
            .await?
            .map(ApiItem::from)
            .ok_or_else(|| GroceryError::not_found(id))
    }

    pub async fn create(&self, draft: ItemDraft) -> Result<ApiItem> {
        validate_draft(&draft)?;
        let id = uuid::Uuid::new_v4().to_string();
        let item = draft.into_stored(id, self.default_aisle);

        self.store.insert(item.clone()).await?;
        tracing::info!(id = %item.id, name = %item.name, "Created catalog item");
        Ok(ApiItem::from(item))
    }

    /// Replaces every mutable field of an existing item; the id is kept.
    pub async fn update(&self, id: &str, draft: ItemDraft) -> Result<ApiItem> {
        validate_draft(&draft)?;
        let item = draft.into_stored(id.to_string(), self.default_aisle);

        if !self.store.replace(item.clone()).await? {
            return Err(GroceryError::not_found(id));
        }
        tracing::info!(id = %id, "Updated catalog item");
        Ok(ApiItem::from(item))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.remove(id).await? {
            return Err(GroceryError::not_found(id));
        }
        tracing::info!(id = %id, "Deleted catalog item");
        Ok(())
    }

    /// Catalog items whose id is selected, in catalog order. Unknown ids
    /// are ignored and a repeated id still yields one item.
    pub async fn resolve_selection(&self, request: &SelectionRequest) -> Result<Vec<StoredItem>> {
        let selected = resolve_selection(self.store.list().await?, request);

        if selected.len() < request.item_ids.len() {
            tracing::debug!(
                "Resolved {} of {} selected ids",
                selected.len(),
                request.item_ids.len()
            );
        }
        Ok(selected)
    }

    pub async fn optimize_route(&self, request: &SelectionRequest) -> Result<Vec<ApiItem>> {
        let selected = self.resolve_selection(request).await?;
        let ordered = route::sequence(&selected);
        tracing::debug!("Sequenced route with {} stops", ordered.len());
        Ok(ordered.iter().map(ApiItem::from).collect())
    }

    pub async fn health(&self) -> Result<()> {
        self.store.health_check().await
    }
}

/// Keeps the catalog entries named by `request`, in catalog order.
pub fn resolve_selection(catalog: Vec<StoredItem>, request: &SelectionRequest) -> Vec<StoredItem> {
    catalog
        .into_iter()
        .filter(|item| request.contains(&item.id))
        .collect()
}

pub fn validate_draft(draft: &ItemDraft) -> Result<()> {
    if draft.name().is_none() {
        return Err(GroceryError::validation("Name and category are required."));
    }
    if draft.category().is_none() && draft.section().is_none() {
        return Err(GroceryError::validation("Name and category are required."));
    }
    if let Some(price) = draft.price {
        if !price.is_finite() || price < 0.0 {
            return Err(GroceryError::validation(
                "Price must be a non-negative number.",
            ));
        }
    }
    Ok(())
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
