//! # Routes
//!
//! Axum router configuration for the commerce service.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - POST /api/orders - Submit an order snapshot
/// - GET  /api/payment-methods - Offered payment methods
/// - GET  /api/products - Active products
/// - GET  /health - Liveness
pub fn create_router(state: AppState) -> Router {
    // The mini-app is served from the chat platform's web view origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/orders", post(handlers::create_order))
        .route("/payment-methods", get(handlers::list_payment_methods))
        .route("/products", get(handlers::list_products));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
