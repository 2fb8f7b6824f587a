use crate::utils::error::{GroceryError, Result};
use std::net::SocketAddr;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<SocketAddr> {
    addr.parse::<SocketAddr>()
        .map_err(|e| GroceryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(GroceryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(GroceryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(GroceryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| GroceryError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_min_length(field_name: &str, value: &str, min_len: usize) -> Result<()> {
    if value.len() < min_len {
        // secrets are not echoed back
        return Err(GroceryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: "<redacted>".to_string(),
            reason: format!("Value must be at least {} bytes long", min_len),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(GroceryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("server.bind", "127.0.0.1:3000").is_ok());
        assert!(validate_socket_addr("server.bind", "[::1]:8080").is_ok());
        assert!(validate_socket_addr("server.bind", "localhost").is_err());
        assert!(validate_socket_addr("server.bind", "").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("storage.path", "data/items.json").is_ok());
        assert!(validate_path("storage.path", "").is_err());
        assert!(validate_path("storage.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_min_length_redacts_value() {
        let err = validate_min_length("auth.jwt_secret", "short", 16).unwrap_err();
        assert!(err.to_string().contains("<redacted>"));
        assert!(!err.to_string().contains("short'"));
        assert!(validate_min_length("auth.jwt_secret", "0123456789abcdef", 16).is_ok());
    }

    #[test]
    fn test_validate_range_and_required() {
        assert!(validate_range("auth.token_ttl_minutes", 120u64, 1, 10_080).is_ok());
        assert!(validate_range("auth.token_ttl_minutes", 0u64, 1, 10_080).is_err());
        assert!(validate_positive_number("catalog.default_aisle", 0, 1).is_err());

        let missing: Option<String> = None;
        assert!(validate_required_field("auth.admin_email", &missing).is_err());
    }
}
