//! # shop-http
//!
//! HTTP plumbing for storefront-checkout-rs.
//!
//! This crate provides:
//!
//! 1. **CommerceClient** - Order Submission Client and payment method fetcher
//!    - `POST {base}/api/orders`
//!    - `GET {base}/api/payment-methods`
//!    - Implements the `OrderBackend` and `PaymentMethodSource` ports
//!    - Builds for native targets and `wasm32`
//!
//! 2. **TelegramInvoiceIssuer** - Bot API `createInvoiceLink` (server side only)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_http::CommerceClient;
//!
//! // Create client from environment
//! let client = CommerceClient::from_env()?;
//!
//! let methods = client.payment_methods().await?;
//! let outcome = client.submit(&request).await?;
//! ```
//!
//! ## Issuing invoices
//!
//! ```rust,ignore
//! use shop_http::{InvoiceDraft, InvoiceIssuer, LabeledPrice, TelegramInvoiceIssuer};
//!
//! let issuer = TelegramInvoiceIssuer::from_env()?;
//! let draft = InvoiceDraft::new("Order 42", "2 items", "order-42", Currency::RUB)
//!     .with_price(LabeledPrice::new("Cake", 50000));
//! let handle = issuer.create_invoice_link(&draft).await?;
//! ```

pub mod client;
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod invoice;

// Re-exports
pub use client::CommerceClient;
pub use config::{BotConfig, CommerceConfig};
#[cfg(not(target_arch = "wasm32"))]
pub use invoice::{InvoiceDraft, InvoiceError, InvoiceIssuer, LabeledPrice, TelegramInvoiceIssuer};
