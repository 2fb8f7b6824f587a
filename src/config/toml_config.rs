use crate::core::catalog::DEFAULT_AISLE;
use crate::utils::error::{GroceryError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    JsonFile,
    Document,
}

impl std::str::FromStr for StorageBackend {
    type Err = GroceryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json_file" | "json" | "file" => Ok(Self::JsonFile),
            "document" | "sqlite" => Ok(Self::Document),
            other => Err(GroceryError::InvalidConfigValueError {
                field: "storage.backend".to_string(),
                value: other.to_string(),
                reason: "Valid backends: json_file, document".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::JsonFile,
            path: "data/items.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub default_aisle: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_aisle: DEFAULT_AISLE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub admin_email: Option<String>,
    pub admin_password_hash: Option<String>,
    pub jwt_secret: Option<String>,
    pub token_ttl_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_email: None,
            admin_password_hash: None,
            jwt_secret: None,
            token_ttl_minutes: 120,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub format: LogFormat,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GroceryError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GroceryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${JWT_SECRET})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GroceryError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 以環境變數覆寫設定 (PORT, CATALOG_BACKEND, CATALOG_PATH, ADMIN_EMAIL, ADMIN_PASSWORD_HASH, JWT_SECRET)
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| GroceryError::InvalidConfigValueError {
                    field: "PORT".to_string(),
                    value: port.clone(),
                    reason: "Port must be a number between 0 and 65535".to_string(),
                })?;
            let mut addr = self.bind_addr()?;
            addr.set_port(port);
            self.server.bind = addr.to_string();
        }
        if let Some(backend) = lookup("CATALOG_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(path) = lookup("CATALOG_PATH") {
            self.storage.path = path;
        }
        if let Some(email) = lookup("ADMIN_EMAIL") {
            self.auth.admin_email = Some(email);
        }
        if let Some(hash) = lookup("ADMIN_PASSWORD_HASH") {
            self.auth.admin_password_hash = Some(hash);
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        validation::validate_socket_addr("server.bind", &self.server.bind)
    }

    /// Checks everything needed to start serving, including secrets.
    pub fn validate_config(&self) -> Result<()> {
        self.bind_addr()?;
        validation::validate_path("storage.path", &self.storage.path)?;
        validation::validate_positive_number(
            "catalog.default_aisle",
            self.catalog.default_aisle as u64,
            1,
        )?;
        validation::validate_range(
            "auth.token_ttl_minutes",
            self.auth.token_ttl_minutes,
            1,
            10_080,
        )?;

        let secret = validation::validate_required_field("auth.jwt_secret", &self.auth.jwt_secret)?;
        validation::validate_min_length("auth.jwt_secret", secret, 16)?;

        let hash = validation::validate_required_field(
            "auth.admin_password_hash",
            &self.auth.admin_password_hash,
        )?;
        crate::core::auth::PasswordHash::parse(hash)?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
