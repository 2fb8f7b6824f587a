#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliArgs, Command};
pub use toml_config::{
    AppConfig, AuthConfig, CatalogConfig, LogFormat, LoggingConfig, ServerConfig, StorageBackend,
    StorageConfig,
};
