//! Grocery Checkout - storefront state service
//!
//! This is the main entry point for the grocery-checkout application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use grocery_checkout::{
    api::create_router,
    config::Config,
    services::{FirebaseIdentity, IdentityProvider, InMemoryIdentity},
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("grocery_checkout={},tower_http=info", config.log_level()))
        .init();

    info!("Starting grocery-checkout server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, countdown={}s, delivery_fee={}c",
          config.host, config.port, config.countdown_seconds, config.delivery_fee_cents);

    let identity: Arc<dyn IdentityProvider> = match &config.firebase_api_key {
        Some(api_key) => {
            info!("Using identity toolkit at {}", config.identity_url);
            Arc::new(FirebaseIdentity::new(api_key.clone(), config.identity_url.clone())?)
        }
        None => {
            warn!("No Firebase API key configured, accounts are kept in memory");
            Arc::new(InMemoryIdentity::new())
        }
    };

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.countdown_seconds,
        config.delivery_fee_cents,
        identity,
    ));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /auth/sign-in | /auth/sign-up | /auth/sign-out");
    info!("  GET  /profile, /categories, /products, /products/:id");
    info!("  GET  /favorites   POST /favorites/:id");
    info!("  GET  /cart        POST /cart/items, /cart/items/:id/(increment|decrement)   DELETE /cart/items/:id");
    info!("  GET  /checkout    POST /checkout, /checkout/cancel, /checkout/acknowledge");
    info!("  GET  /status, /health");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if state.checkout.cancel() {
        info!("Pending checkout cancelled on shutdown");
    }

    info!("Server shutdown complete");
    Ok(())
}
