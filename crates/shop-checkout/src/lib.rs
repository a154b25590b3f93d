//! # shop-checkout
//!
//! Checkout orchestration for the storefront mini-app.
//!
//! This crate provides:
//! - `CheckoutOrchestrator`: mode, payment selection, invoice session and the Submission Sequence
//! - `ControlBindings`: exactly one live handler per host control
//! - `PaymentMethodRegistry`: cached payment method list
//! - `InvoiceSession`: `none → opened → {paid | failed | unknown}`
//! - `ControlsView`: pure derivation of primary/back control state
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_checkout::{CheckoutDeps, CheckoutEvent, CheckoutOptions, CheckoutOrchestrator};
//!
//! let checkout = CheckoutOrchestrator::new(cart.clone(), deps, CheckoutOptions::default());
//!
//! checkout.refresh_payment_methods().await?;
//! checkout.dispatch(CheckoutEvent::EnterOrder)?;
//! checkout.dispatch(CheckoutEvent::SelectPaymentMethod("card-1".into()))?;
//!
//! // The host's primary button now runs the Submission Sequence.
//! let outcome = checkout.trigger_primary().await;
//! ```

pub mod binding;
pub mod invoice;
pub mod notice;
pub mod orchestrator;
pub mod registry;
pub mod view;

// Re-exports
pub use binding::{ButtonBinding, ControlBindings};
pub use invoice::{InvoiceSession, PendingInvoice, SessionStatus};
pub use notice::NoticeTexts;
pub use orchestrator::{
    CheckoutDeps, CheckoutEvent, CheckoutOptions, CheckoutOrchestrator, SubmissionOutcome,
};
pub use registry::PaymentMethodRegistry;
pub use view::{derive_controls, ControlsSnapshot, ControlsView, PrimaryView, CHECKOUT_LABEL};
