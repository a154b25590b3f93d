//! # Order Pricing
//!
//! Validates an incoming order against the catalog and prices it.

use shop_core::{Currency, OrderItem, Price, ProductCatalog};
use shop_http::{InvoiceDraft, LabeledPrice};
use thiserror::Error;

/// Most units of one product a single order may carry
pub const MAX_LINE_COUNT: u32 = 999;

/// Reasons an order is refused before anything is issued
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderRejection {
    #[error("Order has no items")]
    NoItems,

    #[error("Zero quantity for product: {0}")]
    ZeroCount(String),

    #[error("Quantity {count} of {product} exceeds the limit of {max}")]
    QuantityTooLarge {
        product: String,
        count: u32,
        max: u32,
    },

    #[error("Order total is out of range")]
    TotalOutOfRange,

    #[error("Product not found: {0}")]
    UnknownProduct(String),

    #[error("Product is not available: {0}")]
    InactiveProduct(String),

    #[error("Mixed currencies in one order: {0} and {1}")]
    MixedCurrency(Currency, Currency),

    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),
}

/// One priced order line
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: String,
    pub name: String,
    pub count: u32,
    pub total: Price,
}

impl PricedLine {
    pub fn label(&self) -> String {
        format!("{} x{}", self.name, self.count)
    }
}

/// A validated, priced order
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub currency: Currency,
    amount: i64,
}

impl PricedOrder {
    /// Price `items` against `catalog`
    pub fn price(catalog: &ProductCatalog, items: &[OrderItem]) -> Result<Self, OrderRejection> {
        if items.is_empty() {
            return Err(OrderRejection::NoItems);
        }

        let mut lines = Vec::with_capacity(items.len());
        let mut currency = None;
        let mut amount: i64 = 0;

        for item in items {
            if item.count == 0 {
                return Err(OrderRejection::ZeroCount(item.id.clone()));
            }
            if item.count > MAX_LINE_COUNT {
                return Err(OrderRejection::QuantityTooLarge {
                    product: item.id.clone(),
                    count: item.count,
                    max: MAX_LINE_COUNT,
                });
            }
            let product = catalog
                .get(&item.id)
                .ok_or_else(|| OrderRejection::UnknownProduct(item.id.clone()))?;
            if !product.active {
                return Err(OrderRejection::InactiveProduct(item.id.clone()));
            }

            match currency {
                None => currency = Some(product.price.currency),
                Some(c) if c != product.price.currency => {
                    return Err(OrderRejection::MixedCurrency(c, product.price.currency))
                }
                Some(_) => {}
            }

            let total = product
                .price
                .checked_times(item.count)
                .ok_or(OrderRejection::TotalOutOfRange)?;
            amount = amount
                .checked_add(total.amount)
                .ok_or(OrderRejection::TotalOutOfRange)?;

            lines.push(PricedLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                count: item.count,
                total,
            });
        }

        let currency = currency.ok_or(OrderRejection::NoItems)?;
        Ok(Self {
            lines,
            currency,
            amount,
        })
    }

    pub fn total(&self) -> Price {
        Price::from_minor(self.amount, self.currency)
    }

    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.count)).sum()
    }

    /// Invoice for this order; `payload` identifies it on payment
    pub fn invoice_draft(&self, shop_name: &str, order_ref: &str, payload: &str) -> InvoiceDraft {
        let short_ref: String = order_ref.chars().take(8).collect();
        let title: String = format!("{shop_name} #{short_ref}").chars().take(32).collect();
        let summary = self
            .lines
            .iter()
            .map(PricedLine::label)
            .collect::<Vec<_>>()
            .join(", ");
        let description: String = summary.chars().take(255).collect();

        self.lines.iter().fold(
            InvoiceDraft::new(title, description, payload, self.currency),
            |draft, line| draft.with_price(LabeledPrice::new(line.label(), line.total.amount)),
        )
    }
}
