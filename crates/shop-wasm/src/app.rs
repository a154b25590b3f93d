//! # Checkout App
//!
//! JS-facing handle that wires the cart, the WebApp host and the
//! commerce client into one checkout orchestrator.

use crate::host::{TelegramHost, WasmSpawner};
use shop_checkout::{CheckoutDeps, CheckoutEvent, CheckoutOptions, CheckoutOrchestrator};
use shop_core::{CheckoutError, ListenerId, Product, ProductCatalog, SharedCart};
use shop_http::{CommerceClient, CommerceConfig};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

fn to_js(err: CheckoutError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Storefront checkout bound to `Telegram.WebApp`
#[wasm_bindgen]
pub struct CheckoutApp {
    checkout: Rc<CheckoutOrchestrator>,
    cart: SharedCart,
    catalog: ProductCatalog,
    cart_listeners: Vec<ListenerId>,
}

#[wasm_bindgen]
impl CheckoutApp {
    /// `products` is an array of catalog products as served by `/api/products`
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: String, products: JsValue) -> Result<CheckoutApp, JsValue> {
        let products: Vec<Product> = serde_wasm_bindgen::from_value(products)
            .map_err(|e| JsValue::from_str(&format!("Invalid products: {}", e)))?;
        let catalog = ProductCatalog { products };

        let host = Rc::new(TelegramHost::from_window()?);
        let config = CommerceConfig::new(base_url).map_err(to_js)?;
        let client = Rc::new(CommerceClient::new(config).map_err(to_js)?);

        let options = CheckoutOptions::default().with_shopper(host.shopper());
        let deps = CheckoutDeps {
            controls: host.clone(),
            shell: host.clone(),
            surface: host.clone(),
            backend: client.clone(),
            methods: client,
            spawner: Rc::new(WasmSpawner),
        };

        let cart = SharedCart::new();
        let checkout = CheckoutOrchestrator::new(cart.clone(), deps, options);
        host.ready();

        Ok(Self {
            checkout,
            cart,
            catalog,
            cart_listeners: Vec::new(),
        })
    }

    /// Add one unit; returns the new count
    pub fn add_item(&self, product_id: &str) -> Result<u32, JsValue> {
        let product = self
            .catalog
            .get(product_id)
            .filter(|p| p.active)
            .ok_or_else(|| JsValue::from_str(&format!("Product not found: {}", product_id)))?;
        Ok(self.cart.add_item(product))
    }

    /// Remove one unit; returns the new count
    pub fn remove_item(&self, product_id: &str) -> u32 {
        self.cart.remove_item(product_id)
    }

    pub fn count_of(&self, product_id: &str) -> u32 {
        self.cart.count_of(product_id)
    }

    pub fn total_count(&self) -> u32 {
        self.cart.read(|store| store.total_count())
    }

    pub fn clear_cart(&self) {
        self.cart.clear();
    }

    /// Call `callback` after every cart change
    pub fn on_cart_change(&mut self, callback: js_sys::Function) {
        let id = self.cart.subscribe(Rc::new(move || {
            let _ = callback.call0(&JsValue::NULL);
        }));
        self.cart_listeners.push(id);
    }

    pub fn enter_order(&self) -> Result<(), JsValue> {
        self.checkout.dispatch(CheckoutEvent::EnterOrder).map_err(to_js)
    }

    pub fn enter_storefront(&self) -> Result<(), JsValue> {
        self.checkout
            .dispatch(CheckoutEvent::EnterStorefront)
            .map_err(to_js)
    }

    pub fn select_payment_method(&self, method_id: String) -> Result<(), JsValue> {
        self.checkout
            .dispatch(CheckoutEvent::SelectPaymentMethod(method_id))
            .map_err(to_js)
    }

    pub fn set_comment(&self, comment: String) -> Result<(), JsValue> {
        self.checkout
            .dispatch(CheckoutEvent::SetComment(comment))
            .map_err(to_js)
    }

    pub fn set_shipping_zone(&self, zone: Option<String>) -> Result<(), JsValue> {
        self.checkout
            .dispatch(CheckoutEvent::SetShippingZone(zone))
            .map_err(to_js)
    }

    /// Resolves to the fetched payment methods
    pub fn refresh_payment_methods(&self) -> js_sys::Promise {
        let checkout = self.checkout.clone();
        future_to_promise(async move {
            let methods = checkout.refresh_payment_methods().await.map_err(to_js)?;
            serde_wasm_bindgen::to_value(&methods).map_err(JsValue::from)
        })
    }

    /// Last fetched payment methods
    pub fn payment_methods(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.checkout.payment_methods()).map_err(JsValue::from)
    }

    pub fn selected_payment_method(&self) -> Option<String> {
        self.checkout.selected_payment_method().map(|m| m.id)
    }

    pub fn mode(&self) -> String {
        self.checkout.mode().to_string()
    }

    pub fn session_status(&self) -> String {
        self.checkout.session_status().as_str().to_string()
    }

    pub fn is_submitting(&self) -> bool {
        self.checkout.is_submitting()
    }

    /// Unregister host handlers and cart callbacks
    pub fn dispose(&mut self) {
        for id in self.cart_listeners.drain(..) {
            self.cart.unsubscribe(id);
        }
        self.checkout.dispose();
    }
}
