//! # WebApp Host
//!
//! Host ports over `window.Telegram.WebApp`. Every JS call goes through
//! `Reflect` so a missing method is a logged no-op rather than a trap.

use async_trait::async_trait;
use js_sys::{Array, Function, Promise, Reflect};
use shop_core::{
    ActionHandler, HostControl, HostControls, HostShell, InvoiceHandle, InvoiceStatus,
    LocalSpawner, LocalTask, Notice, NoticeLevel, PaymentSurface, ShopperIdentity,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// First WebApp version with `openInvoice`
pub const INVOICE_MIN_VERSION: &str = "6.1";

struct Registration {
    control: HostControl,
    handler: ActionHandler,
    callback: Closure<dyn FnMut()>,
}

/// `Telegram.WebApp` as host controls, shell and payment surface
pub struct TelegramHost {
    web_app: JsValue,
    registrations: RefCell<Vec<Registration>>,
}

impl TelegramHost {
    pub fn new(web_app: JsValue) -> Self {
        Self {
            web_app,
            registrations: RefCell::new(Vec::new()),
        }
    }

    /// Bind to `globalThis.Telegram.WebApp`
    pub fn from_window() -> Result<Self, JsValue> {
        let telegram = Reflect::get(&js_sys::global(), &"Telegram".into())?;
        if telegram.is_undefined() {
            return Err(JsValue::from_str("Telegram WebApp script is not loaded"));
        }
        let web_app = Reflect::get(&telegram, &"WebApp".into())?;
        if web_app.is_undefined() {
            return Err(JsValue::from_str("Telegram.WebApp is not available"));
        }
        Ok(Self::new(web_app))
    }

    /// Tell the host the app is ready to be shown
    pub fn ready(&self) {
        self.invoke(&self.web_app, "ready", &[]);
    }

    /// Identity from `initDataUnsafe`. Unverified; the server must not trust it.
    pub fn shopper(&self) -> ShopperIdentity {
        let init_data = get(&self.web_app, "initDataUnsafe");
        let user_id = id_at(&get(&init_data, "user"));
        let chat_id = id_at(&get(&init_data, "chat")).or(user_id);
        ShopperIdentity::new(user_id, chat_id)
    }

    /// Host WebApp version string
    pub fn version(&self) -> Option<String> {
        get(&self.web_app, "version").as_string()
    }

    /// Number of live click registrations
    pub fn registration_count(&self) -> usize {
        self.registrations.borrow().len()
    }

    fn button(&self, control: HostControl) -> JsValue {
        match control {
            HostControl::Primary => get(&self.web_app, "MainButton"),
            HostControl::Back => get(&self.web_app, "BackButton"),
        }
    }

    fn invoke(&self, target: &JsValue, method: &str, args: &[&JsValue]) -> Option<JsValue> {
        match call(target, method, args) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(method, error = ?e, "WebApp call failed");
                None
            }
        }
    }
}

impl HostControls for TelegramHost {
    fn on_click(&self, control: HostControl, handler: ActionHandler) {
        // The click is deferred to a task so the handler may unregister
        // its own callback while running.
        let deferred = handler.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            let handler = deferred.clone();
            wasm_bindgen_futures::spawn_local(async move { handler() });
        });

        self.invoke(&self.button(control), "onClick", &[callback.as_ref()]);
        self.registrations.borrow_mut().push(Registration {
            control,
            handler,
            callback,
        });
        debug!(%control, "click handler registered");
    }

    fn off_click(&self, control: HostControl, handler: &ActionHandler) {
        let removed = {
            let mut registrations = self.registrations.borrow_mut();
            registrations
                .iter()
                .position(|r| r.control == control && Rc::ptr_eq(&r.handler, handler))
                .map(|index| registrations.remove(index))
        };

        if let Some(registration) = removed {
            self.invoke(
                &self.button(control),
                "offClick",
                &[registration.callback.as_ref()],
            );
            debug!(%control, "click handler unregistered");
        }
    }

    fn set_visible(&self, control: HostControl, visible: bool) {
        let method = if visible { "show" } else { "hide" };
        self.invoke(&self.button(control), method, &[]);
    }

    fn set_label(&self, control: HostControl, label: &str) {
        if control == HostControl::Primary {
            self.invoke(&self.button(control), "setText", &[&JsValue::from_str(label)]);
        }
    }

    fn set_busy(&self, control: HostControl, busy: bool) {
        if control != HostControl::Primary {
            return;
        }
        if busy {
            self.invoke(&self.button(control), "showProgress", &[&JsValue::FALSE]);
        } else {
            self.invoke(&self.button(control), "hideProgress", &[]);
        }
    }

    fn set_enabled(&self, control: HostControl, enabled: bool) {
        if control == HostControl::Primary {
            let method = if enabled { "enable" } else { "disable" };
            self.invoke(&self.button(control), method, &[]);
        }
    }
}

impl HostShell for TelegramHost {
    fn notify(&self, notice: &Notice) {
        let haptics = get(&self.web_app, "HapticFeedback");
        if !haptics.is_undefined() {
            self.invoke(
                &haptics,
                "notificationOccurred",
                &[&JsValue::from_str(haptic_type(notice.level))],
            );
        }
        self.invoke(&self.web_app, "showAlert", &[&JsValue::from_str(&notice.message)]);
    }

    fn close(&self) {
        self.invoke(&self.web_app, "close", &[]);
    }

    fn set_closing_confirmation(&self, enabled: bool) {
        let method = if enabled {
            "enableClosingConfirmation"
        } else {
            "disableClosingConfirmation"
        };
        self.invoke(&self.web_app, method, &[]);
    }
}

#[async_trait(?Send)]
impl PaymentSurface for TelegramHost {
    fn supports_invoices(&self) -> bool {
        let has_method = get(&self.web_app, "openInvoice").is_function();
        let recent = self
            .invoke(
                &self.web_app,
                "isVersionAtLeast",
                &[&JsValue::from_str(INVOICE_MIN_VERSION)],
            )
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        has_method && recent
    }

    async fn open_invoice(&self, handle: &InvoiceHandle) -> InvoiceStatus {
        let web_app = self.web_app.clone();
        let url = JsValue::from_str(handle.as_str());

        let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
            let on_close = Closure::once_into_js(move |status: JsValue| {
                let _ = resolve.call1(&JsValue::NULL, &status);
            });
            if let Err(e) = call(&web_app, "openInvoice", &[&url, &on_close]) {
                warn!(error = ?e, "openInvoice threw");
            }
        });

        match JsFuture::from(promise).await {
            Ok(status) => {
                let status = status.as_string().unwrap_or_default();
                debug!(invoice = %handle, %status, "invoice closed");
                InvoiceStatus::from_host(&status)
            }
            Err(e) => {
                warn!(invoice = %handle, error = ?e, "invoice promise rejected");
                InvoiceStatus::Unknown
            }
        }
    }
}

/// Runs tasks on the browser microtask queue
#[derive(Debug, Default, Clone, Copy)]
pub struct WasmSpawner;

impl LocalSpawner for WasmSpawner {
    fn spawn_local(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// `HapticFeedback.notificationOccurred` type for a notice
pub fn haptic_type(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "success",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    }
}

fn get(target: &JsValue, key: &str) -> JsValue {
    if target.is_undefined() || target.is_null() {
        return JsValue::UNDEFINED;
    }
    Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn id_at(target: &JsValue) -> Option<i64> {
    get(target, "id").as_f64().map(|id| id as i64)
}

fn call(target: &JsValue, method: &str, args: &[&JsValue]) -> Result<JsValue, JsValue> {
    let function: Function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into()?;
    let array = Array::new();
    for arg in args {
        array.push(arg);
    }
    function.apply(target, &array)
}
