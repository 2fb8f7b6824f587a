pub mod auth;
pub mod catalog;
pub mod route;

pub use crate::domain::model::{ApiItem, ItemDraft, SelectionRequest, StoredItem};
pub use crate::domain::ports::{CatalogStore, CredentialVerifier};
pub use crate::utils::error::Result;
