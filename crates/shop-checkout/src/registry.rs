//! # Payment Method Registry
//!
//! Fetches the payment methods offered by the commerce service and caches
//! the last successful list. A failed fetch never touches the cache.

use shop_core::{CheckoutError, CheckoutResult, PaymentMethod, PaymentMethodSource};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, instrument, warn};

/// Cached view of the commerce service's payment methods
pub struct PaymentMethodRegistry {
    source: Rc<dyn PaymentMethodSource>,
    cache: RefCell<Vec<PaymentMethod>>,
    loaded: Cell<bool>,
}

impl PaymentMethodRegistry {
    pub fn new(source: Rc<dyn PaymentMethodSource>) -> Self {
        Self {
            source,
            cache: RefCell::new(Vec::new()),
            loaded: Cell::new(false),
        }
    }

    /// Fetch and replace the cached list wholesale
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> CheckoutResult<Vec<PaymentMethod>> {
        match self.source.fetch_payment_methods().await {
            Ok(methods) => {
                debug!(count = methods.len(), "payment methods refreshed");
                *self.cache.borrow_mut() = methods.clone();
                self.loaded.set(true);
                Ok(methods)
            }
            Err(e) => {
                warn!(error = %e, cached = self.cache.borrow().len(), "payment method fetch failed");
                Err(e)
            }
        }
    }

    /// Last successfully fetched list, in service order
    pub fn methods(&self) -> Vec<PaymentMethod> {
        self.cache.borrow().clone()
    }

    pub fn get(&self, method_id: &str) -> Option<PaymentMethod> {
        self.cache
            .borrow()
            .iter()
            .find(|m| m.id == method_id)
            .cloned()
    }

    pub fn contains(&self, method_id: &str) -> bool {
        self.cache.borrow().iter().any(|m| m.id == method_id)
    }

    /// Whether any fetch has succeeded yet
    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    /// Check that `method_id` can be selected
    pub fn validate_selection(&self, method_id: &str) -> CheckoutResult<()> {
        if self.contains(method_id) {
            Ok(())
        } else {
            Err(CheckoutError::UnknownPaymentMethod {
                method_id: method_id.to_string(),
            })
        }
    }
}
