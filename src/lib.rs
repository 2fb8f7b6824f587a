pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliArgs, Command};

pub use crate::adapters::http::{router, AppState};
pub use crate::adapters::storage::{open_store, DocumentStore, JsonFileStore};
pub use crate::config::AppConfig;
pub use crate::core::catalog::CatalogService;
pub use crate::core::route::{sequence, RouteStop};
pub use crate::domain::model::{ApiItem, ItemDraft, SelectionRequest, StoredItem};
pub use crate::utils::error::{GroceryError, Result};
