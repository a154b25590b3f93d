#![allow(dead_code)]

use async_trait::async_trait;
use shop_checkout::{CheckoutDeps, CheckoutEvent, CheckoutOptions, CheckoutOrchestrator};
use shop_core::{
    ActionHandler, CheckoutError, CheckoutResult, Currency, HostControl, HostControls, HostShell,
    InvoiceHandle, InvoiceStatus, LocalSpawner, LocalTask, Notice, NoticeLevel, OrderBackend,
    OrderRequest, PaymentMethod, PaymentMethodSource, PaymentSurface, Price, Product, SharedCart,
    SubmissionResponse,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use tokio::sync::Notify;

// =============================================================================
// Host
// =============================================================================

/// Records everything the orchestrator does to the host
#[derive(Default)]
pub struct FakeHost {
    handlers: RefCell<Vec<(HostControl, ActionHandler)>>,
    registrations: Cell<usize>,
    labels: RefCell<HashMap<HostControl, String>>,
    visible: RefCell<HashMap<HostControl, bool>>,
    busy: RefCell<HashMap<HostControl, bool>>,
    enabled: RefCell<HashMap<HostControl, bool>>,
    pub notices: RefCell<Vec<Notice>>,
    pub closes: Cell<u32>,
    pub closing_confirmation: Cell<bool>,
}

impl FakeHost {
    pub fn handler_count(&self, control: HostControl) -> usize {
        self.handlers
            .borrow()
            .iter()
            .filter(|(c, _)| *c == control)
            .count()
    }

    pub fn registrations(&self) -> usize {
        self.registrations.get()
    }

    /// Invoke every handler currently registered on `control`
    pub fn click(&self, control: HostControl) {
        let handlers: Vec<ActionHandler> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(c, _)| *c == control)
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler();
        }
    }

    pub fn label(&self, control: HostControl) -> Option<String> {
        self.labels.borrow().get(&control).cloned()
    }

    pub fn is_visible(&self, control: HostControl) -> bool {
        self.visible.borrow().get(&control).copied().unwrap_or(false)
    }

    pub fn is_busy(&self, control: HostControl) -> bool {
        self.busy.borrow().get(&control).copied().unwrap_or(false)
    }

    pub fn is_enabled(&self, control: HostControl) -> bool {
        self.enabled.borrow().get(&control).copied().unwrap_or(true)
    }

    pub fn last_notice(&self) -> Option<Notice> {
        self.notices.borrow().last().cloned()
    }

    pub fn notice_count(&self, level: NoticeLevel) -> usize {
        self.notices
            .borrow()
            .iter()
            .filter(|n| n.level == level)
            .count()
    }
}

impl HostControls for FakeHost {
    fn on_click(&self, control: HostControl, handler: ActionHandler) {
        self.registrations.set(self.registrations.get() + 1);
        self.handlers.borrow_mut().push((control, handler));
    }

    fn off_click(&self, control: HostControl, handler: &ActionHandler) {
        self.handlers
            .borrow_mut()
            .retain(|(c, h)| !(*c == control && Rc::ptr_eq(h, handler)));
    }

    fn set_visible(&self, control: HostControl, visible: bool) {
        self.visible.borrow_mut().insert(control, visible);
    }

    fn set_label(&self, control: HostControl, label: &str) {
        self.labels.borrow_mut().insert(control, label.to_string());
    }

    fn set_busy(&self, control: HostControl, busy: bool) {
        self.busy.borrow_mut().insert(control, busy);
    }

    fn set_enabled(&self, control: HostControl, enabled: bool) {
        self.enabled.borrow_mut().insert(control, enabled);
    }
}

impl HostShell for FakeHost {
    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }

    fn close(&self) {
        self.closes.set(self.closes.get() + 1);
    }

    fn set_closing_confirmation(&self, enabled: bool) {
        self.closing_confirmation.set(enabled);
    }
}

// =============================================================================
// Payment surface
// =============================================================================

/// Resolves invoices with scripted statuses
pub struct FakeSurface {
    pub supports: Cell<bool>,
    statuses: RefCell<VecDeque<InvoiceStatus>>,
    pub opened: RefCell<Vec<InvoiceHandle>>,
    probe: RefCell<Option<Box<dyn Fn()>>>,
}

impl Default for FakeSurface {
    fn default() -> Self {
        Self {
            supports: Cell::new(true),
            statuses: RefCell::new(VecDeque::new()),
            opened: RefCell::new(Vec::new()),
            probe: RefCell::new(None),
        }
    }
}

impl FakeSurface {
    pub fn resolve_with(&self, status: InvoiceStatus) {
        self.statuses.borrow_mut().push_back(status);
    }

    /// Run `probe` when an invoice is opened, before it resolves
    pub fn on_open(&self, probe: impl Fn() + 'static) {
        *self.probe.borrow_mut() = Some(Box::new(probe));
    }
}

#[async_trait(?Send)]
impl PaymentSurface for FakeSurface {
    fn supports_invoices(&self) -> bool {
        self.supports.get()
    }

    async fn open_invoice(&self, handle: &InvoiceHandle) -> InvoiceStatus {
        self.opened.borrow_mut().push(handle.clone());
        if let Some(probe) = self.probe.borrow().as_ref() {
            probe();
        }
        self.statuses
            .borrow_mut()
            .pop_front()
            .unwrap_or(InvoiceStatus::Unknown)
    }
}

// =============================================================================
// Commerce service
// =============================================================================

/// Scripted order backend; optionally waits on a gate before replying
#[derive(Default)]
pub struct FakeBackend {
    replies: RefCell<VecDeque<CheckoutResult<SubmissionResponse>>>,
    pub requests: RefCell<Vec<OrderRequest>>,
    gate: RefCell<Option<Rc<Notify>>>,
}

impl FakeBackend {
    pub fn reply(&self, reply: CheckoutResult<SubmissionResponse>) {
        self.replies.borrow_mut().push_back(reply);
    }

    pub fn reply_invoice(&self, handle: &str) {
        self.reply(Ok(SubmissionResponse::Invoice(InvoiceHandle::new(handle))));
    }

    /// Hold every reply until the returned gate is notified
    pub fn gated(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        *self.gate.borrow_mut() = Some(gate.clone());
        gate
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait(?Send)]
impl OrderBackend for FakeBackend {
    async fn submit_order(&self, request: &OrderRequest) -> CheckoutResult<SubmissionResponse> {
        self.requests.borrow_mut().push(request.clone());
        let gate = self.gate.borrow().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(CheckoutError::Network("no scripted reply".into())))
    }
}

/// Scripted payment method listing
#[derive(Default)]
pub struct FakeMethods {
    replies: RefCell<VecDeque<CheckoutResult<Vec<PaymentMethod>>>>,
    pub calls: Cell<u32>,
}

impl FakeMethods {
    pub fn reply(&self, reply: CheckoutResult<Vec<PaymentMethod>>) {
        self.replies.borrow_mut().push_back(reply);
    }
}

#[async_trait(?Send)]
impl PaymentMethodSource for FakeMethods {
    async fn fetch_payment_methods(&self) -> CheckoutResult<Vec<PaymentMethod>> {
        self.calls.set(self.calls.get() + 1);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(CheckoutError::Network("no scripted reply".into())))
    }
}

// =============================================================================
// Spawner
// =============================================================================

/// Queues spawned tasks until the test drives them
#[derive(Default)]
pub struct QueueSpawner {
    tasks: RefCell<VecDeque<LocalTask>>,
    pub spawned: Cell<usize>,
}

impl QueueSpawner {
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Hand the queued tasks to the test so it can poll them concurrently
    pub fn take_tasks(&self) -> Vec<LocalTask> {
        self.tasks.borrow_mut().drain(..).collect()
    }

    /// Run queued tasks one after another until the queue is empty
    pub async fn run_all(&self) {
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => task.await,
                None => break,
            }
        }
    }
}

impl LocalSpawner for QueueSpawner {
    fn spawn_local(&self, task: LocalTask) {
        self.spawned.set(self.spawned.get() + 1);
        self.tasks.borrow_mut().push_back(task);
    }
}

// =============================================================================
// Harness
// =============================================================================

pub struct Harness {
    pub host: Rc<FakeHost>,
    pub surface: Rc<FakeSurface>,
    pub backend: Rc<FakeBackend>,
    pub methods: Rc<FakeMethods>,
    pub spawner: Rc<QueueSpawner>,
    pub cart: SharedCart,
    pub checkout: Rc<CheckoutOrchestrator>,
}

impl Harness {
    pub fn new(options: CheckoutOptions) -> Self {
        let host = Rc::new(FakeHost::default());
        let surface = Rc::new(FakeSurface::default());
        let backend = Rc::new(FakeBackend::default());
        let methods = Rc::new(FakeMethods::default());
        let spawner = Rc::new(QueueSpawner::default());
        let cart = SharedCart::new();

        let deps = Self::deps_for(&host, &surface, &backend, &methods, &spawner);
        let checkout = CheckoutOrchestrator::new(cart.clone(), deps, options);

        Self {
            host,
            surface,
            backend,
            methods,
            spawner,
            cart,
            checkout,
        }
    }

    pub fn deps_for(
        host: &Rc<FakeHost>,
        surface: &Rc<FakeSurface>,
        backend: &Rc<FakeBackend>,
        methods: &Rc<FakeMethods>,
        spawner: &Rc<QueueSpawner>,
    ) -> CheckoutDeps {
        CheckoutDeps {
            controls: host.clone(),
            shell: host.clone(),
            surface: surface.clone(),
            backend: backend.clone(),
            methods: methods.clone(),
            spawner: spawner.clone(),
        }
    }

    pub fn deps(&self) -> CheckoutDeps {
        Self::deps_for(
            &self.host,
            &self.surface,
            &self.backend,
            &self.methods,
            &self.spawner,
        )
    }

    /// Order mode, `{p1: 2}` in the cart, `card-1` selected
    pub async fn ready_to_pay() -> Self {
        let h = Self::new(CheckoutOptions::default());
        h.cart.add_count(&product("p1"), 2);
        h.methods.reply(Ok(vec![card(), crypto()]));
        h.checkout.refresh_payment_methods().await.unwrap();
        h.checkout
            .dispatch(CheckoutEvent::EnterOrder)
            .unwrap();
        h.checkout
            .dispatch(CheckoutEvent::SelectPaymentMethod("card-1".into()))
            .unwrap();
        h
    }
}

pub fn product(id: &str) -> Product {
    Product::new(id, id.to_uppercase(), Price::from_minor(25000, Currency::RUB))
}

pub fn card() -> PaymentMethod {
    PaymentMethod::new("card-1", "Card", "Pay with a bank card")
}

pub fn crypto() -> PaymentMethod {
    PaymentMethod::new("crypto", "Crypto", "Pay with cryptocurrency")
}
