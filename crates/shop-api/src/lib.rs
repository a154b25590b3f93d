//! # shop-api
//!
//! Commerce service for storefront-checkout-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Order intake that prices the cart snapshot and issues invoices
//! - Payment method and product listings
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/orders` | Submit order, get `{confirmed}` or `{invoiceHandle}` |
//! | GET | `/api/payment-methods` | List payment methods |
//! | GET | `/api/products` | List products |

pub mod handlers;
pub mod pricing;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, PaymentMethodConfig, StoreConfig};
