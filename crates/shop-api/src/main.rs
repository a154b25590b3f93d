//! # Storefront API
//!
//! Commerce service behind the storefront mini-app.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export TELEGRAM_BOT_TOKEN=123456789:AA...
//! export TELEGRAM_PROVIDER_TOKEN=284685063:TEST:...
//! export STORE_CONFIG=config/store.toml
//!
//! # Run the server
//! storefront-api
//! ```

use shop_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.products.len());
    info!(
        "Payment methods: {:?}",
        state
            .payment_methods
            .iter()
            .map(|m| m.id.as_str())
            .collect::<Vec<_>>()
    );
    info!("Invoice issuer: {}", state.issuer.issuer_name());

    let app = routes::create_router(state);

    info!("Storefront API v{} starting on http://{}", env!("CARGO_PKG_VERSION"), addr);

    if !is_prod {
        info!("Orders: POST http://{}/api/orders", addr);
        info!("Payment methods: GET http://{}/api/payment-methods", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
