//! # Host and Backend Ports
//!
//! Traits the checkout talks through. The host (chat-platform WebApp)
//! provides the action controls, the shell and the payment surface; the
//! commerce service provides order submission and payment methods.
//!
//! ```text
//! ┌──────────────────────── host ────────────────────────┐
//! │  HostControls   HostShell   PaymentSurface  Spawner  │
//! └──────────────────────────────────────────────────────┘
//!                          ▲
//!                 CheckoutOrchestrator
//!                          ▼
//! ┌─────────────────── commerce service ─────────────────┐
//! │        OrderBackend           PaymentMethodSource    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs on the host's single-threaded event loop, so the async
//! traits are `?Send` and handlers are `Rc`.

use crate::error::CheckoutResult;
use crate::order::{OrderRequest, SubmissionResponse};
use crate::payment::{InvoiceHandle, InvoiceStatus, PaymentMethod};
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

/// Click callback registered on a host control.
///
/// Identity is pointer identity: the host is handed the same `Rc` on
/// `off_click` that it received on `on_click`.
pub type ActionHandler = Rc<dyn Fn()>;

/// The two host-managed controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostControl {
    /// Main action button at the bottom of the host view
    Primary,
    /// Back button in the host header
    Back,
}

impl std::fmt::Display for HostControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostControl::Primary => f.write_str("primary"),
            HostControl::Back => f.write_str("back"),
        }
    }
}

/// Host action controls. Each control holds click callbacks plus
/// independent visibility, label, busy and enabled setters.
pub trait HostControls {
    fn on_click(&self, control: HostControl, handler: ActionHandler);

    fn off_click(&self, control: HostControl, handler: &ActionHandler);

    fn set_visible(&self, control: HostControl, visible: bool);

    /// Back controls have no label; hosts may ignore it there.
    fn set_label(&self, control: HostControl, label: &str);

    fn set_busy(&self, control: HostControl, busy: bool);

    fn set_enabled(&self, control: HostControl, enabled: bool);
}

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A single user-visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Host-level side effects outside the two controls
pub trait HostShell {
    /// Show a notice (haptic plus alert, as the host sees fit)
    fn notify(&self, notice: &Notice);

    /// Close the mini-app
    fn close(&self);

    /// Ask the shopper to confirm before closing
    fn set_closing_confirmation(&self, enabled: bool);
}

/// Host payment surface
#[async_trait(?Send)]
pub trait PaymentSurface {
    /// Whether the host can open invoices at all
    fn supports_invoices(&self) -> bool {
        true
    }

    /// Open an invoice and wait until the host resolves it
    async fn open_invoice(&self, handle: &InvoiceHandle) -> InvoiceStatus;
}

/// Order submission endpoint of the commerce service
#[async_trait(?Send)]
pub trait OrderBackend {
    async fn submit_order(&self, request: &OrderRequest) -> CheckoutResult<SubmissionResponse>;
}

/// Payment method listing of the commerce service
#[async_trait(?Send)]
pub trait PaymentMethodSource {
    async fn fetch_payment_methods(&self) -> CheckoutResult<Vec<PaymentMethod>>;
}

/// A unit of work for the host event loop
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Runs tasks on the host's event loop without blocking it
pub trait LocalSpawner {
    fn spawn_local(&self, task: LocalTask);
}
