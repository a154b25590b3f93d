//! # shop-core
//!
//! Core types and ports for the storefront checkout.
//!
//! This crate provides:
//! - `Product`, `Price` and `ProductCatalog` for the catalog
//! - `CartStore` and `SharedCart` for the shopper's cart
//! - `AppMode`, `OrderRequest` and `SubmissionResponse` for checkout
//! - `PaymentMethod`, `InvoiceHandle` and `InvoiceStatus` for payment
//! - Host and backend port traits (`HostControls`, `PaymentSurface`, `OrderBackend`, ...)
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use shop_core::{Currency, OrderRequest, Price, Product, SharedCart, ShopperIdentity};
//!
//! let cart = SharedCart::new();
//! let burger = Product::new("burger", "Burger", Price::from_minor(450, Currency::USD));
//! cart.add_item(&burger);
//! cart.add_item(&burger);
//!
//! let request = OrderRequest::from_snapshot(&ShopperIdentity::default(), cart.snapshot(), None)?;
//! assert_eq!(request.item_count(), 2);
//! # Ok::<(), shop_core::CheckoutError>(())
//! ```

pub mod cart;
pub mod error;
pub mod order;
pub mod payment;
pub mod ports;
pub mod product;

// Re-exports for convenience
pub use cart::{CartEntry, CartListener, CartStore, ListenerId, SharedCart};
pub use error::{CheckoutError, CheckoutResult, ErrorKind};
pub use order::{
    AppMode, OrderItem, OrderRequest, ShopperIdentity, SubmissionBody, SubmissionResponse,
};
pub use payment::{InvoiceHandle, InvoiceStatus, PaymentMethod};
pub use ports::{
    ActionHandler, HostControl, HostControls, HostShell, LocalSpawner, LocalTask, Notice,
    NoticeLevel, OrderBackend, PaymentMethodSource, PaymentSurface,
};
pub use product::{Currency, Price, Product, ProductCatalog};
