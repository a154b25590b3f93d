//! # Payment Types
//!
//! Payment methods offered by the commerce service, and the invoice
//! handle/status exchanged with the host payment surface.

use serde::{Deserialize, Serialize};

/// A payment method offered by the commerce service. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl PaymentMethod {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Opaque invoice reference issued by the backend (usually an invoice link)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceHandle(String);

impl InvoiceHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InvoiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the host payment surface resolved an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Paid,
    Failed,
    /// No definitive signal (cancelled, pending, anything else)
    Unknown,
}

impl InvoiceStatus {
    /// Map the host's status string
    pub fn from_host(status: &str) -> Self {
        match status {
            "paid" => InvoiceStatus::Paid,
            "failed" => InvoiceStatus::Failed,
            _ => InvoiceStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Failed => "failed",
            InvoiceStatus::Unknown => "unknown",
        }
    }
}
