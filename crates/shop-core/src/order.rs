//! # Order Types
//!
//! Application mode, order request and submission response types.
//! The wire format matches what the mini-app backend expects: camelCase
//! JSON, items as `{ id, count }`.

use crate::error::{CheckoutError, CheckoutResult};
use crate::payment::InvoiceHandle;
use serde::{Deserialize, Serialize};

/// Top-level mode of the mini-app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppMode {
    /// Browsing products
    Storefront,
    /// Reviewing the cart and checking out
    Order,
}

impl Default for AppMode {
    fn default() -> Self {
        AppMode::Storefront
    }
}

impl std::fmt::Display for AppMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppMode::Storefront => f.write_str("storefront"),
            AppMode::Order => f.write_str("order"),
        }
    }
}

/// A line in an order request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product ID
    pub id: String,
    /// Quantity
    pub count: u32,
}

/// Who is placing the order, as reported by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopperIdentity {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub chat_id: Option<i64>,
}

impl ShopperIdentity {
    pub fn new(user_id: Option<i64>, chat_id: Option<i64>) -> Self {
        Self { user_id, chat_id }
    }
}

/// Order snapshot sent to the backend. Built per submission, never retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: Option<i64>,
    pub chat_id: Option<i64>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub shipping_zone: Option<String>,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub payment_method_id: Option<String>,
    #[serde(default)]
    pub invoice_supported: bool,
}

impl OrderRequest {
    /// Build a request from a cart snapshot.
    ///
    /// Zero-count lines are dropped; an empty result is `EmptyCart`.
    pub fn from_snapshot(
        shopper: &ShopperIdentity,
        items: Vec<OrderItem>,
        payment_method_id: Option<String>,
    ) -> CheckoutResult<Self> {
        let items: Vec<OrderItem> = items.into_iter().filter(|i| i.count > 0).collect();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(Self {
            user_id: shopper.user_id,
            chat_id: shopper.chat_id,
            comment: String::new(),
            shipping_zone: None,
            items,
            payment_method_id,
            invoice_supported: false,
        })
    }

    /// Builder: set comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Builder: set shipping zone
    pub fn with_shipping_zone(mut self, zone: Option<String>) -> Self {
        self.shipping_zone = zone;
        self
    }

    /// Builder: record whether the host can open invoices
    pub fn with_invoice_supported(mut self, supported: bool) -> Self {
        self.invoice_supported = supported;
        self
    }

    /// Total number of units
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.count).sum()
    }
}

/// What the backend did with an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResponse {
    /// Order accepted, nothing to pay through the host
    Confirmed,
    /// Shopper must pay the given invoice
    Invoice(InvoiceHandle),
}

/// Raw response body. Exactly one of the two shapes is expected.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
    #[serde(default, alias = "invoice_link", skip_serializing_if = "Option::is_none")]
    pub invoice_handle: Option<String>,
}

impl SubmissionBody {
    pub fn confirmed() -> Self {
        Self {
            confirmed: Some(true),
            invoice_handle: None,
        }
    }

    pub fn invoice(handle: impl Into<String>) -> Self {
        Self {
            confirmed: None,
            invoice_handle: Some(handle.into()),
        }
    }
}

impl TryFrom<SubmissionBody> for SubmissionResponse {
    type Error = CheckoutError;

    fn try_from(body: SubmissionBody) -> Result<Self, Self::Error> {
        match (body.invoice_handle, body.confirmed) {
            (Some(handle), _) if !handle.is_empty() => {
                Ok(SubmissionResponse::Invoice(InvoiceHandle::new(handle)))
            }
            (Some(_), _) => Err(CheckoutError::MalformedResponse(
                "empty invoice handle".to_string(),
            )),
            (None, Some(true)) => Ok(SubmissionResponse::Confirmed),
            (None, _) => Err(CheckoutError::MalformedResponse(
                "neither confirmation nor invoice handle".to_string(),
            )),
        }
    }
}

impl SubmissionResponse {
    /// Parse a JSON response body
    pub fn from_json(body: &str) -> CheckoutResult<Self> {
        let raw: SubmissionBody = serde_json::from_str(body)
            .map_err(|e| CheckoutError::MalformedResponse(e.to_string()))?;
        raw.try_into()
    }
}
