// Adapters layer: concrete implementations for external systems (storage backends, http surface).

pub mod http;
pub mod storage;
