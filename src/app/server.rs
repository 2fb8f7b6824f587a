use crate::adapters::http::{self, AppState};
use crate::adapters::storage::open_store;
use crate::config::AppConfig;
use crate::core::auth::{AuthService, PasswordHash, StaticAdminVerifier, TokenIssuer};
use crate::core::catalog::CatalogService;
use crate::domain::ports::CatalogStore;
use crate::utils::error::{GroceryError, Result};
use crate::utils::validation::validate_required_field;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Wires services around an already opened store.
pub fn build_state(config: &AppConfig, store: Arc<dyn CatalogStore>) -> Result<AppState> {
    let secret = validate_required_field("auth.jwt_secret", &config.auth.jwt_secret)?;
    let hash = validate_required_field(
        "auth.admin_password_hash",
        &config.auth.admin_password_hash,
    )?;

    let verifier = StaticAdminVerifier::new(
        config.auth.admin_email.clone().unwrap_or_default(),
        PasswordHash::parse(hash)?,
    );
    let tokens = TokenIssuer::new(secret.as_bytes(), config.auth.token_ttl_minutes);

    Ok(AppState {
        catalog: CatalogService::new(store, config.catalog.default_aisle),
        auth: AuthService::new(Arc::new(verifier), tokens),
    })
}

/// Serves `state` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Full service lifecycle: open and health-check the store, serve until
/// Ctrl-C, then close the store.
pub async fn run(config: AppConfig) -> Result<()> {
    let store = open_store(&config.storage).await?;
    store
        .health_check()
        .await
        .map_err(|e| GroceryError::StoreUnavailable {
            message: format!("startup health check failed: {}", e),
        })?;

    let state = build_state(&config, Arc::clone(&store))?;
    let listener = TcpListener::bind(config.bind_addr()?).await?;

    let served = serve(listener, state, shutdown_signal()).await;

    if let Err(e) = store.close().await {
        tracing::warn!("Failed to close catalog store: {}", e);
    }
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // never resolve; the process is stopped externally
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
