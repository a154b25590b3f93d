//! # Cart Store
//!
//! Product → quantity mapping owned by the page/session context.
//! `CartStore` is plain data; `SharedCart` is the single-threaded handle
//! that widgets and the checkout orchestrator share.

use crate::order::OrderItem;
use crate::product::{Price, Product};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// A product with its quantity. `count` is always > 0.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    pub product: Product,
    pub count: u32,
}

impl CartEntry {
    /// Price of this entry
    pub fn total(&self) -> Price {
        self.product.price.times(self.count)
    }
}

/// Cart contents keyed by product id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartStore {
    entries: BTreeMap<String, CartEntry>,
}

impl CartStore {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product, returning the new count
    pub fn add_item(&mut self, product: &Product) -> u32 {
        self.add_count(product, 1)
    }

    /// Add `count` units of a product, returning the new count
    pub fn add_count(&mut self, product: &Product, count: u32) -> u32 {
        if count == 0 {
            return self.count_of(&product.id);
        }
        let entry = self
            .entries
            .entry(product.id.clone())
            .or_insert_with(|| CartEntry {
                product: product.clone(),
                count: 0,
            });
        entry.count = entry.count.saturating_add(count);
        entry.count
    }

    /// Remove one unit of a product, returning the remaining count.
    /// The entry is dropped when it reaches zero.
    pub fn remove_item(&mut self, product_id: &str) -> u32 {
        let Some(entry) = self.entries.get_mut(product_id) else {
            return 0;
        };
        entry.count -= 1;
        let remaining = entry.count;
        if remaining == 0 {
            self.entries.remove(product_id);
        }
        remaining
    }

    /// Empty the cart
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Check if cart is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct products
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all counts
    pub fn total_count(&self) -> u32 {
        self.entries.values().map(|e| e.count).sum()
    }

    /// Quantity of a product (0 if absent)
    pub fn count_of(&self, product_id: &str) -> u32 {
        self.entries.get(product_id).map(|e| e.count).unwrap_or(0)
    }

    /// Look up an entry
    pub fn get(&self, product_id: &str) -> Option<&CartEntry> {
        self.entries.get(product_id)
    }

    /// Iterate entries in product-id order
    pub fn entries(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.values()
    }

    /// Copy the cart into order line items
    pub fn snapshot(&self) -> Vec<OrderItem> {
        self.entries
            .values()
            .map(|e| OrderItem {
                id: e.product.id.clone(),
                count: e.count,
            })
            .collect()
    }
}

/// Callback fired after every cart mutation
pub type CartListener = Rc<dyn Fn()>;

/// Handle returned by [`SharedCart::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Shared {
    store: RefCell<CartStore>,
    listeners: RefCell<Vec<(ListenerId, CartListener)>>,
    next_id: Cell<u64>,
}

/// Shared, observable cart for a single-threaded UI.
///
/// Cloning yields another handle to the same cart. Listeners run after
/// the store borrow is released, so they may read the cart freely.
#[derive(Clone, Default)]
pub struct SharedCart {
    inner: Rc<Shared>,
}

impl SharedCart {
    /// Create an empty shared cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing store
    pub fn from_store(store: CartStore) -> Self {
        let cart = Self::new();
        *cart.inner.store.borrow_mut() = store;
        cart
    }

    pub fn add_item(&self, product: &Product) -> u32 {
        let count = self.inner.store.borrow_mut().add_item(product);
        self.notify();
        count
    }

    pub fn add_count(&self, product: &Product, count: u32) -> u32 {
        let total = self.inner.store.borrow_mut().add_count(product, count);
        self.notify();
        total
    }

    pub fn remove_item(&self, product_id: &str) -> u32 {
        let (existed, remaining) = {
            let mut store = self.inner.store.borrow_mut();
            let existed = store.get(product_id).is_some();
            (existed, store.remove_item(product_id))
        };
        if existed {
            self.notify();
        }
        remaining
    }

    pub fn clear(&self) {
        let was_empty = {
            let mut store = self.inner.store.borrow_mut();
            let was_empty = store.is_empty();
            store.clear();
            was_empty
        };
        if !was_empty {
            self.notify();
        }
    }

    /// Read the store without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&CartStore) -> R) -> R {
        f(&self.inner.store.borrow())
    }

    pub fn is_empty(&self) -> bool {
        self.inner.store.borrow().is_empty()
    }

    pub fn count_of(&self, product_id: &str) -> u32 {
        self.inner.store.borrow().count_of(product_id)
    }

    /// Point-in-time copy of the line items
    pub fn snapshot(&self) -> Vec<OrderItem> {
        self.inner.store.borrow().snapshot()
    }

    /// Register a change listener
    pub fn subscribe(&self, listener: CartListener) -> ListenerId {
        let id = ListenerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Remove a change listener
    pub fn unsubscribe(&self, id: ListenerId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }

    fn notify(&self) {
        let listeners: Vec<CartListener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

impl std::fmt::Debug for SharedCart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCart")
            .field("store", &self.inner.store.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}
