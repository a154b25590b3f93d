//! # shop-wasm
//!
//! WebAssembly build of the storefront checkout for the chat-platform
//! mini-app.
//!
//! This crate provides:
//! - `CheckoutApp`: cart plus checkout orchestrator, driven from JS
//! - `TelegramHost`: host ports over `Telegram.WebApp`
//! - Console forwarding for `tracing` output
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { CheckoutApp } from 'storefront-checkout-wasm';
//!
//! await init();
//!
//! const products = (await (await fetch('/api/products')).json()).products;
//! const app = new CheckoutApp('https://shop.example.com', products);
//!
//! app.on_cart_change(render);
//! await app.refresh_payment_methods();
//! app.add_item('burger');
//! app.enter_order();
//! app.select_payment_method('card-1');
//! // MainButton now submits the order and opens the invoice.
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

pub mod app;
pub mod console;
pub mod host;

pub use app::CheckoutApp;
pub use host::{TelegramHost, WasmSpawner};

use shop_core::{Currency, Price};
use wasm_bindgen::prelude::*;

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    console::install(tracing::Level::INFO);
}

/// Format an amount in the smallest currency unit for display
#[wasm_bindgen]
pub fn format_price(amount: i64, currency: &str) -> Result<String, JsValue> {
    let currency: Currency = serde_wasm_bindgen::from_value(JsValue::from_str(currency))
        .map_err(|_| JsValue::from_str(&format!("Unknown currency: {}", currency)))?;
    Ok(Price::from_minor(amount, currency).display())
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
