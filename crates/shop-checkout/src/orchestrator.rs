//! # Checkout Orchestrator
//!
//! Owns the app mode, the payment method selection and the invoice
//! session, and drives the Submission Sequence:
//!
//! ```text
//! storefront ──enter-order──▶ order ──primary──▶ [in flight]
//!     ▲                         ▲                    │
//!     │ confirmed               │ failed / unknown   │ invoice handle
//!     │ (cart cleared)          │ (cart kept)        ▼
//!     └─────────────────────────┴──────────── invoice opened ──paid──▶ close
//! ```
//!
//! All state lives behind `Cell`/`RefCell` on a single-threaded event
//! loop. No borrow is held across an `.await` or across a call into the
//! host or the cart.

use crate::binding::ControlBindings;
use crate::invoice::{session_status, InvoiceSession, PendingInvoice, SessionStatus};
use crate::notice::NoticeTexts;
use crate::registry::PaymentMethodRegistry;
use crate::view::{ControlsSnapshot, ControlsView, CHECKOUT_LABEL};
use shop_core::{
    ActionHandler, AppMode, CheckoutError, CheckoutResult, HostControls, HostShell,
    InvoiceHandle, ListenerId, LocalSpawner, OrderBackend, OrderRequest, PaymentMethod,
    PaymentMethodSource, PaymentSurface, SharedCart, ShopperIdentity, SubmissionResponse,
};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, error, info, instrument, warn};

/// Collaborators the orchestrator talks to
#[derive(Clone)]
pub struct CheckoutDeps {
    pub controls: Rc<dyn HostControls>,
    pub shell: Rc<dyn HostShell>,
    pub surface: Rc<dyn PaymentSurface>,
    pub backend: Rc<dyn OrderBackend>,
    pub methods: Rc<dyn PaymentMethodSource>,
    pub spawner: Rc<dyn LocalSpawner>,
}

/// Checkout behaviour knobs
#[derive(Debug, Clone)]
pub struct CheckoutOptions {
    /// Identity reported by the host
    pub shopper: ShopperIdentity,
    /// Refuse to submit without a selected payment method
    pub require_payment_method: bool,
    /// Primary control label in order mode
    pub checkout_label: String,
    /// Notice texts
    pub texts: NoticeTexts,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            shopper: ShopperIdentity::default(),
            require_payment_method: true,
            checkout_label: CHECKOUT_LABEL.to_string(),
            texts: NoticeTexts::default(),
        }
    }
}

impl CheckoutOptions {
    /// Builder: set shopper identity
    pub fn with_shopper(mut self, shopper: ShopperIdentity) -> Self {
        self.shopper = shopper;
        self
    }

    /// Builder: require (or not) an explicit payment method
    pub fn with_required_payment_method(mut self, required: bool) -> Self {
        self.require_payment_method = required;
        self
    }

    /// Builder: set primary label
    pub fn with_checkout_label(mut self, label: impl Into<String>) -> Self {
        self.checkout_label = label.into();
        self
    }
}

/// Inbound events from UI collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEvent {
    EnterOrder,
    EnterStorefront,
    SelectPaymentMethod(String),
    SetComment(String),
    SetShippingZone(Option<String>),
}

/// Result of a primary-action trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Storefront trigger switched to order mode
    EnteredOrder,
    /// Not in order mode, or a submission was already in flight
    Ignored,
    /// Validation failed before any network call
    Rejected(CheckoutError),
    /// Backend confirmed without an invoice
    Confirmed,
    /// Invoice paid, app closed
    Paid,
    /// Invoice declined
    PaymentFailed,
    /// Host gave no definitive invoice status
    PaymentIndeterminate,
    /// Submission failed before an invoice opened
    Failed(CheckoutError),
}

#[derive(Debug, Default)]
struct CheckoutState {
    mode: AppMode,
    selected: Option<String>,
    session: Option<InvoiceSession>,
    comment: String,
    shipping_zone: Option<String>,
}

/// The checkout state machine
pub struct CheckoutOrchestrator {
    this: Weak<Self>,
    deps: CheckoutDeps,
    options: CheckoutOptions,
    cart: SharedCart,
    registry: PaymentMethodRegistry,
    state: RefCell<CheckoutState>,
    in_flight: Cell<bool>,
    bindings: RefCell<ControlBindings>,
    cart_listener: Cell<Option<ListenerId>>,
    disposed: Cell<bool>,
}

impl CheckoutOrchestrator {
    /// Create the orchestrator, bind the host controls and start
    /// observing the cart.
    pub fn new(cart: SharedCart, deps: CheckoutDeps, options: CheckoutOptions) -> Rc<Self> {
        let registry = PaymentMethodRegistry::new(deps.methods.clone());
        let orchestrator = Rc::new_cyclic(|this| Self {
            this: this.clone(),
            deps,
            options,
            cart,
            registry,
            state: RefCell::new(CheckoutState::default()),
            in_flight: Cell::new(false),
            bindings: RefCell::new(ControlBindings::new()),
            cart_listener: Cell::new(None),
            disposed: Cell::new(false),
        });

        let weak = orchestrator.this.clone();
        let listener = orchestrator.cart.subscribe(Rc::new(move || {
            if let Some(orchestrator) = weak.upgrade() {
                orchestrator.sync_controls();
            }
        }));
        orchestrator.cart_listener.set(Some(listener));
        orchestrator.sync_controls();
        orchestrator
    }

    // =========================================================================
    // Inbound events
    // =========================================================================

    /// Apply a UI event
    pub fn dispatch(&self, event: CheckoutEvent) -> CheckoutResult<()> {
        match event {
            CheckoutEvent::EnterOrder => self.set_mode(AppMode::Order),
            CheckoutEvent::EnterStorefront => {
                if self.in_flight.get() {
                    warn!("back navigation refused while a submission is in flight");
                    return Err(CheckoutError::SubmissionInFlight);
                }
                self.set_mode(AppMode::Storefront);
            }
            CheckoutEvent::SelectPaymentMethod(method_id) => {
                if self.mode() != AppMode::Order {
                    debug!(%method_id, "selection ignored outside order mode");
                    return Err(CheckoutError::NotInOrderMode);
                }
                self.registry.validate_selection(&method_id)?;
                debug!(%method_id, "payment method selected");
                self.state.borrow_mut().selected = Some(method_id);
            }
            CheckoutEvent::SetComment(comment) => self.state.borrow_mut().comment = comment,
            CheckoutEvent::SetShippingZone(zone) => self.state.borrow_mut().shipping_zone = zone,
        }
        Ok(())
    }

    /// What the primary control does for the current mode
    pub async fn trigger_primary(&self) -> SubmissionOutcome {
        match self.mode() {
            AppMode::Storefront => {
                self.set_mode(AppMode::Order);
                SubmissionOutcome::EnteredOrder
            }
            AppMode::Order => self.submit().await,
        }
    }

    /// What the back control does
    pub fn trigger_back(&self) -> CheckoutResult<()> {
        self.dispatch(CheckoutEvent::EnterStorefront)
    }

    /// Refresh the payment method list. Failures keep the old list.
    pub async fn refresh_payment_methods(&self) -> CheckoutResult<Vec<PaymentMethod>> {
        match self.registry.fetch().await {
            Ok(methods) => {
                let mut state = self.state.borrow_mut();
                let stale = state
                    .selected
                    .as_ref()
                    .is_some_and(|id| !methods.iter().any(|m| &m.id == id));
                if stale {
                    debug!("selected payment method no longer offered, clearing selection");
                    state.selected = None;
                }
                Ok(methods)
            }
            Err(e) => {
                self.deps.shell.notify(&self.options.texts.for_fetch_error(&e));
                Err(e)
            }
        }
    }

    // =========================================================================
    // Submission Sequence
    // =========================================================================

    /// Run the Submission Sequence. Ignored outside order mode and while
    /// another submission is in flight.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> SubmissionOutcome {
        if self.mode() != AppMode::Order {
            return SubmissionOutcome::Ignored;
        }
        if self.in_flight.replace(true) {
            debug!("primary trigger ignored, submission already in flight");
            return SubmissionOutcome::Ignored;
        }
        self.run_submission().await
    }

    /// Body of the Submission Sequence. The caller has already claimed
    /// `in_flight`; every path below releases it.
    async fn run_submission(&self) -> SubmissionOutcome {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                self.in_flight.set(false);
                debug!(error = %e, "submission rejected");
                self.sync_controls();
                self.report(&e);
                return SubmissionOutcome::Rejected(e);
            }
        };

        self.sync_controls();
        info!(
            items = request.items.len(),
            units = request.item_count(),
            payment_method = ?request.payment_method_id,
            "submitting order"
        );

        match self.deps.backend.submit_order(&request).await {
            Ok(SubmissionResponse::Confirmed) => self.complete_confirmed(),
            Ok(SubmissionResponse::Invoice(handle)) => self.pay_invoice(handle).await,
            Err(e) => self.fail(e),
        }
    }

    fn build_request(&self) -> CheckoutResult<OrderRequest> {
        let items = self.cart.snapshot();
        if items.iter().all(|item| item.count == 0) {
            return Err(CheckoutError::EmptyCart);
        }

        let invoice_supported = self.deps.surface.supports_invoices();
        let state = self.state.borrow();
        let payment_method_id = match &state.selected {
            Some(id) => Some(id.clone()),
            None if self.options.require_payment_method => {
                return Err(CheckoutError::NoPaymentMethodSelected)
            }
            None => None,
        };

        Ok(
            OrderRequest::from_snapshot(&self.options.shopper, items, payment_method_id)?
                .with_comment(state.comment.clone())
                .with_shipping_zone(state.shipping_zone.clone())
                .with_invoice_supported(invoice_supported),
        )
    }

    fn complete_confirmed(&self) -> SubmissionOutcome {
        info!("order confirmed without invoice");
        self.in_flight.set(false);
        self.cart.clear();
        self.set_mode(AppMode::Storefront);
        self.sync_controls();
        self.deps.shell.notify(&self.options.texts.confirmed());
        SubmissionOutcome::Confirmed
    }

    async fn pay_invoice(&self, handle: InvoiceHandle) -> SubmissionOutcome {
        if !self.deps.surface.supports_invoices() {
            return self.fail(CheckoutError::InvoiceUnsupported);
        }

        let pending = PendingInvoice::new(handle);
        self.state.borrow_mut().session = Some(pending.session().clone());
        info!(invoice = %pending.handle(), "invoice opened");

        let status = self.deps.surface.open_invoice(pending.handle()).await;
        let session = pending.settle(status);
        let handle = session.handle().clone();
        let settled = session.status();
        self.state.borrow_mut().session = Some(session);
        self.in_flight.set(false);

        match settled {
            SessionStatus::Paid => {
                info!(invoice = %handle, "invoice paid");
                self.cart.clear();
                self.sync_controls();
                self.deps.shell.close();
                SubmissionOutcome::Paid
            }
            SessionStatus::Failed => {
                warn!(invoice = %handle, "invoice payment failed");
                self.sync_controls();
                self.report(&CheckoutError::PaymentFailed {
                    handle: handle.to_string(),
                });
                SubmissionOutcome::PaymentFailed
            }
            _ => {
                warn!(invoice = %handle, "invoice status indeterminate");
                self.sync_controls();
                self.report(&CheckoutError::PaymentIndeterminate {
                    handle: handle.to_string(),
                });
                SubmissionOutcome::PaymentIndeterminate
            }
        }
    }

    fn fail(&self, e: CheckoutError) -> SubmissionOutcome {
        error!(error = %e, "order submission failed");
        self.in_flight.set(false);
        self.sync_controls();
        self.report(&e);
        SubmissionOutcome::Failed(e)
    }

    fn report(&self, e: &CheckoutError) {
        self.deps.shell.notify(&self.options.texts.for_error(e));
    }

    // =========================================================================
    // Host controls
    // =========================================================================

    fn set_mode(&self, mode: AppMode) {
        let previous = std::mem::replace(&mut self.state.borrow_mut().mode, mode);
        if previous != mode {
            info!(from = %previous, to = %mode, "mode changed");
            self.sync_controls();
        }
    }

    fn snapshot(&self) -> ControlsSnapshot {
        ControlsSnapshot {
            mode: self.mode(),
            cart_empty: self.cart.is_empty(),
            submission_in_flight: self.in_flight.get(),
        }
    }

    /// Re-derive the control view and handlers from current state
    fn sync_controls(&self) {
        if self.disposed.get() {
            return;
        }
        let snapshot = self.snapshot();
        ControlsView::derive(snapshot, &self.options.checkout_label)
            .apply(self.deps.controls.as_ref(), self.deps.shell.as_ref());

        let on_primary = self.primary_handler(snapshot.mode);
        let this = self.this.clone();
        self.bindings.borrow_mut().rebind(
            self.deps.controls.as_ref(),
            snapshot.mode,
            on_primary,
            move || back_handler(this),
        );
    }

    fn primary_handler(&self, mode: AppMode) -> ActionHandler {
        let this = self.this.clone();
        match mode {
            AppMode::Storefront => Rc::new(move || {
                if let Some(orchestrator) = this.upgrade() {
                    orchestrator.set_mode(AppMode::Order);
                }
            }),
            AppMode::Order => Rc::new(move || {
                let Some(orchestrator) = this.upgrade() else {
                    return;
                };
                if orchestrator.mode() != AppMode::Order {
                    return;
                }
                // Claimed at click time so a second click before the task runs is dropped.
                if orchestrator.in_flight.replace(true) {
                    debug!("primary click ignored, submission already in flight");
                    return;
                }
                orchestrator.sync_controls();
                let spawner = orchestrator.deps.spawner.clone();
                spawner.spawn_local(Box::pin(async move {
                    orchestrator.run_submission().await;
                }));
            }),
        }
    }

    /// Unregister host handlers and stop observing the cart
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.bindings
            .borrow_mut()
            .teardown(self.deps.controls.as_ref());
        if let Some(listener) = self.cart_listener.take() {
            self.cart.unsubscribe(listener);
        }
        debug!("checkout orchestrator disposed");
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn mode(&self) -> AppMode {
        self.state.borrow().mode
    }

    /// Selected method; hidden outside order mode
    pub fn selected_payment_method(&self) -> Option<PaymentMethod> {
        let state = self.state.borrow();
        if state.mode != AppMode::Order {
            return None;
        }
        state.selected.as_deref().and_then(|id| self.registry.get(id))
    }

    /// Last fetched payment methods
    pub fn payment_methods(&self) -> Vec<PaymentMethod> {
        self.registry.methods()
    }

    pub fn invoice_session(&self) -> Option<InvoiceSession> {
        self.state.borrow().session.clone()
    }

    pub fn session_status(&self) -> SessionStatus {
        session_status(self.state.borrow().session.as_ref())
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.get()
    }

    pub fn comment(&self) -> String {
        self.state.borrow().comment.clone()
    }

    pub fn shipping_zone(&self) -> Option<String> {
        self.state.borrow().shipping_zone.clone()
    }

    /// Control view for the current state
    pub fn controls(&self) -> ControlsView {
        ControlsView::derive(self.snapshot(), &self.options.checkout_label)
    }

    pub fn cart(&self) -> &SharedCart {
        &self.cart
    }
}

fn back_handler(this: Weak<CheckoutOrchestrator>) -> ActionHandler {
    Rc::new(move || {
        if let Some(orchestrator) = this.upgrade() {
            if let Err(e) = orchestrator.trigger_back() {
                debug!(error = %e, "back action refused");
            }
        }
    })
}

impl Drop for CheckoutOrchestrator {
    fn drop(&mut self) {
        self.dispose();
    }
}
