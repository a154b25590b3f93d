//! # Invoice Issuer
//!
//! Issues invoice links through the Bot API `createInvoiceLink` method.
//! The returned link is the opaque handle the mini-app hands to
//! `openInvoice`.

use crate::config::BotConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shop_core::{Currency, InvoiceHandle};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

/// Bot API invoice errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceError {
    /// Draft failed local checks
    #[error("Invalid invoice: {0}")]
    InvalidDraft(String),

    /// Transport failure talking to the Bot API
    #[error("Network error: {0}")]
    Network(String),

    /// Bot API answered `ok: false`
    #[error("Bot API error [{status}]: {description}")]
    Api { status: u16, description: String },

    /// Bot API body could not be decoded
    #[error("Malformed Bot API response: {0}")]
    Malformed(String),

    /// Client could not be constructed
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// A price portion shown on the invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledPrice {
    pub label: String,
    /// Smallest currency unit
    pub amount: i64,
}

impl LabeledPrice {
    pub fn new(label: impl Into<String>, amount: i64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Everything needed to issue one invoice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub title: String,
    pub description: String,
    /// Bot-defined payload, echoed back on successful payment
    pub payload: String,
    pub currency: Currency,
    pub prices: Vec<LabeledPrice>,
}

impl InvoiceDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        payload: impl Into<String>,
        currency: Currency,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            payload: payload.into(),
            currency,
            prices: Vec::new(),
        }
    }

    /// Builder: add a price portion
    pub fn with_price(mut self, price: LabeledPrice) -> Self {
        self.prices.push(price);
        self
    }

    pub fn total(&self) -> i64 {
        self.prices
            .iter()
            .fold(0i64, |total, p| total.saturating_add(p.amount))
    }

    /// Bot API limits: title 1-32, description 1-255, payload 1-128 bytes
    pub fn validate(&self) -> Result<(), InvoiceError> {
        let check = |field: &str, value: &str, max: usize| {
            if value.is_empty() || value.chars().count() > max {
                Err(InvoiceError::InvalidDraft(format!(
                    "{field} must be 1-{max} characters"
                )))
            } else {
                Ok(())
            }
        };
        check("title", &self.title, 32)?;
        check("description", &self.description, 255)?;
        if self.payload.is_empty() || self.payload.len() > 128 {
            return Err(InvoiceError::InvalidDraft(
                "payload must be 1-128 bytes".to_string(),
            ));
        }
        if self.prices.is_empty() {
            return Err(InvoiceError::InvalidDraft("no prices".to_string()));
        }
        if self.total() <= 0 {
            return Err(InvoiceError::InvalidDraft(
                "total must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Creates invoice links. Shared across server tasks.
#[async_trait]
pub trait InvoiceIssuer: Send + Sync {
    /// Issue an invoice and return its handle
    async fn create_invoice_link(&self, draft: &InvoiceDraft) -> Result<InvoiceHandle, InvoiceError>;

    /// Issuer name, for logs
    fn issuer_name(&self) -> &'static str;
}

/// `createInvoiceLink` over the Bot API
pub struct TelegramInvoiceIssuer {
    config: BotConfig,
    client: Client,
}

impl TelegramInvoiceIssuer {
    pub fn new(config: BotConfig) -> Result<Self, InvoiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| InvoiceError::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InvoiceError> {
        let config =
            BotConfig::from_env().map_err(|e| InvoiceError::Configuration(e.to_string()))?;
        Self::new(config)
    }
}

#[async_trait]
impl InvoiceIssuer for TelegramInvoiceIssuer {
    #[instrument(skip(self, draft), fields(payload = %draft.payload, total = draft.total()))]
    async fn create_invoice_link(&self, draft: &InvoiceDraft) -> Result<InvoiceHandle, InvoiceError> {
        draft.validate()?;

        let request = CreateInvoiceLink {
            title: &draft.title,
            description: &draft.description,
            payload: &draft.payload,
            provider_token: &self.config.provider_token,
            currency: draft.currency.code(),
            prices: &draft.prices,
        };

        debug!(prices = draft.prices.len(), "creating invoice link");

        let response = self
            .client
            .post(self.config.method_url("createInvoiceLink"))
            .json(&request)
            .send()
            .await
            .map_err(|e| InvoiceError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InvoiceError::Network(e.to_string()))?;

        let parsed: BotApiResponse<String> = serde_json::from_str(&body).map_err(|e| {
            error!(status = status.as_u16(), body = %body, "undecodable Bot API response");
            InvoiceError::Malformed(e.to_string())
        })?;

        match parsed {
            BotApiResponse {
                ok: true,
                result: Some(link),
                ..
            } if !link.is_empty() => {
                info!(link = %link, "invoice link created");
                Ok(InvoiceHandle::new(link))
            }
            BotApiResponse { ok: true, .. } => Err(InvoiceError::Malformed(
                "ok response without an invoice link".to_string(),
            )),
            BotApiResponse { description, .. } => {
                let description = description.unwrap_or_else(|| format!("HTTP {status}"));
                error!(status = status.as_u16(), %description, "Bot API rejected invoice");
                Err(InvoiceError::Api {
                    status: status.as_u16(),
                    description,
                })
            }
        }
    }

    fn issuer_name(&self) -> &'static str {
        "telegram"
    }
}

// =============================================================================
// Bot API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateInvoiceLink<'a> {
    title: &'a str,
    description: &'a str,
    payload: &'a str,
    provider_token: &'a str,
    currency: &'a str,
    prices: &'a [LabeledPrice],
}

#[derive(Debug, Deserialize)]
struct BotApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> InvoiceDraft {
        InvoiceDraft::new("Order 42", "2 items", "order-42", Currency::RUB)
            .with_price(LabeledPrice::new("Cake", 50000))
    }

    #[test]
    fn test_valid_draft() {
        assert!(draft().validate().is_ok());
        assert_eq!(draft().total(), 50000);
    }

    #[test]
    fn test_draft_limits() {
        let mut long_title = draft();
        long_title.title = "x".repeat(33);
        assert!(long_title.validate().is_err());

        let mut no_prices = draft();
        no_prices.prices.clear();
        assert!(matches!(no_prices.validate(), Err(InvoiceError::InvalidDraft(_))));

        let mut free = draft();
        free.prices = vec![LabeledPrice::new("Gift", 0)];
        assert!(free.validate().is_err());
    }

    #[test]
    fn test_bot_api_envelope() {
        let ok: BotApiResponse<String> =
            serde_json::from_str(r#"{"ok":true,"result":"https://t.me/$abc"}"#).unwrap();
        assert!(ok.ok);
        assert_eq!(ok.result.as_deref(), Some("https://t.me/$abc"));

        let failed: BotApiResponse<String> =
            serde_json::from_str(r#"{"ok":false,"error_code":400,"description":"Bad Request: CURRENCY_INVALID"}"#)
                .unwrap();
        assert!(!failed.ok);
        assert!(failed.result.is_none());
    }
}
