//! # Product Types
//!
//! Catalog entries as the storefront sells them. The backend loads the
//! catalog from `config/store.toml`; the checkout itself only looks at
//! `Product::id`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies the chat platform accepts for invoices (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    RUB,
    UAH,
    KZT,
    USD,
    EUR,
    GBP,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::RUB => "RUB",
            Currency::UAH => "UAH",
            Currency::KZT => "KZT",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::RUB => "₽",
            Currency::UAH => "₴",
            Currency::KZT => "₸",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Amount in minor units (kopecks, cents). All supported currencies use two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub amount: i64,
    pub currency: Currency,
}

impl Price {
    pub fn from_minor(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Price of `count` units, saturating at the `i64` bounds
    pub fn times(&self, count: u32) -> Price {
        Price {
            amount: self.amount.saturating_mul(i64::from(count)),
            currency: self.currency,
        }
    }

    /// Price of `count` units, or `None` on overflow
    pub fn checked_times(&self, count: u32) -> Option<Price> {
        self.amount
            .checked_mul(i64::from(count))
            .map(|amount| Price::from_minor(amount, self.currency))
    }

    /// Human form, e.g. "₽450.00"
    pub fn display(&self) -> String {
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        format!("{sign}{}{}.{:02}", self.currency.symbol(), abs / 100, abs % 100)
    }
}

/// Something the storefront sells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier, used as the cart key and on the order wire
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Inactive products stay in the file but cannot be ordered
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            image_url: None,
            active: true,
        }
    }
}

/// Ordered product list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products that can be put in a cart, in file order
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }

    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}
