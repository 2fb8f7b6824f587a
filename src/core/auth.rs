use crate::domain::model::{LoginResponse, Principal};
use crate::domain::ports::CredentialVerifier;
use crate::utils::error::{GroceryError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_ROLE: &str = "admin";

/// bcrypt password hash (`$2a$`, `$2b$` or `$2y$` modular crypt form).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    encoded: String,
}

impl PasswordHash {
    pub fn parse(encoded: &str) -> Result<Self> {
        let encoded = encoded.trim();
        encoded
            .parse::<bcrypt::HashParts>()
            .map_err(|e| GroceryError::ConfigValidationError {
                field: "auth.admin_password_hash".to_string(),
                message: format!("not a bcrypt hash: {}", e),
            })?;

        Ok(Self {
            encoded: encoded.to_string(),
        })
    }

    pub fn new(password: &str, cost: u32) -> Result<Self> {
        Ok(Self {
            encoded: bcrypt::hash(password, cost)?,
        })
    }

    pub fn verify(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.encoded).unwrap_or_else(|e| {
            tracing::warn!("Password hash check failed: {}", e);
            false
        })
    }

    pub fn encode(&self) -> &str {
        &self.encoded
    }
}

/// Produces the encoded hash stored in `auth.admin_password_hash`.
/// The CLI defaults `cost` to `bcrypt::DEFAULT_COST`.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(PasswordHash::new(password, cost)?.encode().to_string())
}

fn invalid_credentials() -> GroceryError {
    GroceryError::Unauthorized {
        message: "Invalid credentials.".to_string(),
    }
}

/// The single configured administrator. Accepts either the literal
/// login id `admin` or the configured email.
pub struct StaticAdminVerifier {
    admin_email: String,
    password_hash: PasswordHash,
}

impl StaticAdminVerifier {
    pub fn new(admin_email: impl Into<String>, password_hash: PasswordHash) -> Self {
        Self {
            admin_email: admin_email.into(),
            password_hash,
        }
    }

    pub fn principal(&self) -> Principal {
        Principal {
            username: ADMIN_USERNAME.to_string(),
            email: self.admin_email.clone(),
            role: ADMIN_ROLE.to_string(),
        }
    }
}

#[async_trait]
impl CredentialVerifier for StaticAdminVerifier {
    async fn verify(&self, login_id: &str, password: &str) -> Result<Principal> {
        let known = login_id == ADMIN_USERNAME
            || (!self.admin_email.is_empty() && login_id == self.admin_email);

        // hash even for unknown ids so both paths cost the same
        let password_ok = self.password_hash.verify(password);

        if known && password_ok {
            Ok(self.principal())
        } else {
            Err(invalid_credentials())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl_minutes: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::minutes(ttl_minutes as i64),
        }
    }

    pub fn issue(&self, principal: &Principal) -> Result<String> {
        self.issue_at(principal, Utc::now())
    }

    fn issue_at(&self, principal: &Principal, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: principal.username.clone(),
            email: principal.email.clone(),
            role: principal.role.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Principal> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            GroceryError::Forbidden {
                message: "Invalid token.".to_string(),
            }
        })?;

        Ok(Principal {
            username: data.claims.sub,
            email: data.claims.email,
            role: data.claims.role,
        })
    }
}

/// Login flow: credential check followed by token issuance.
#[derive(Clone)]
pub struct AuthService {
    verifier: Arc<dyn CredentialVerifier>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, tokens: TokenIssuer) -> Self {
        Self { verifier, tokens }
    }

    pub async fn login(&self, login_id: &str, password: &str) -> Result<LoginResponse> {
        let user = self
            .verifier
            .verify(login_id, password)
            .await
            .inspect_err(|_| tracing::warn!(login_id = %login_id, "Login rejected"))?;
        let token = self.tokens.issue(&user)?;
        tracing::info!(username = %user.username, "Issued session token");
        Ok(LoginResponse { token, user })
    }

    /// Checks a bearer token and requires the admin role.
    pub fn authorize_admin(&self, token: &str) -> Result<Principal> {
        let principal = self.tokens.verify(token)?;
        if principal.role != ADMIN_ROLE {
            return Err(GroceryError::Forbidden {
                message: "Admin role required.".to_string(),
            });
        }
        Ok(principal)
    }
}
