use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroceryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error("Password hash error: {0}")]
    HashError(#[from] bcrypt::BcryptError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("{message}")]
    ValidationError { message: String },

    #[error("Item not found: {id}")]
    NotFound { id: String },

    #[error("Item already exists: {id}")]
    Conflict { id: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Client,
    Auth,
    Storage,
    Config,
    Internal,
}

impl GroceryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::NotFound { .. } | Self::Conflict { .. } => {
                ErrorCategory::Client
            }
            Self::Unauthorized { .. } | Self::Forbidden { .. } => ErrorCategory::Auth,
            Self::IoError(_) | Self::DatabaseError(_) | Self::StoreUnavailable { .. } => {
                ErrorCategory::Storage
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Config,
            Self::SerializationError(_) | Self::TokenError(_) | Self::HashError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// HTTP status the error maps to at the API boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::StoreUnavailable { .. } => 503,
            _ => 500,
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Config => 2,
            ErrorCategory::Storage => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, GroceryError>;
