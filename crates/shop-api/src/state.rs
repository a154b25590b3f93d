//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the store catalog, the offered payment methods and the
//! invoice issuer.

use serde::{Deserialize, Serialize};
use shop_core::{PaymentMethod, Product, ProductCatalog};
use shop_http::{InvoiceIssuer, TelegramInvoiceIssuer};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Path of the store definition
    pub store_config: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            store_config: std::env::var("STORE_CONFIG")
                .unwrap_or_else(|_| "config/store.toml".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// A payment method as configured on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Whether orders paid this way go through an invoice. Never sent to clients.
    #[serde(default = "default_true")]
    pub requires_invoice: bool,
}

fn default_true() -> bool {
    true
}

impl PaymentMethodConfig {
    /// Client-facing view
    pub fn public(&self) -> PaymentMethod {
        PaymentMethod::new(&self.id, &self.title, &self.description)
    }
}

/// Store definition: catalog plus payment methods
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Shown in invoice titles
    #[serde(default = "default_shop_name")]
    pub shop_name: String,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethodConfig>,
}

fn default_shop_name() -> String {
    "Storefront".to_string()
}

impl StoreConfig {
    /// Parse a TOML store definition
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let store: StoreConfig = toml::from_str(content)?;

        let mut products = HashSet::new();
        for product in &store.products {
            if !products.insert(product.id.as_str()) {
                anyhow::bail!("Duplicate product id: {}", product.id);
            }
        }

        let mut methods = HashSet::new();
        for method in &store.payment_methods {
            if !methods.insert(method.id.as_str()) {
                anyhow::bail!("Duplicate payment method id: {}", method.id);
            }
        }
        Ok(store)
    }

    /// Product catalog view
    pub fn catalog(&self) -> ProductCatalog {
        ProductCatalog {
            products: self.products.clone(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Product catalog
    pub catalog: Arc<ProductCatalog>,
    /// Payment methods, in configured order
    pub payment_methods: Arc<Vec<PaymentMethodConfig>>,
    /// Invoice issuer
    pub issuer: Arc<dyn InvoiceIssuer>,
    /// Shown in invoice titles
    pub shop_name: String,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState with the Bot API issuer
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let store = load_store_config(&config.store_config)?;

        let issuer = TelegramInvoiceIssuer::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize invoice issuer: {}", e))?;

        Ok(Self::with_parts(config, store, Arc::new(issuer)))
    }

    /// Assemble state from explicit parts
    pub fn with_parts(
        config: AppConfig,
        store: StoreConfig,
        issuer: Arc<dyn InvoiceIssuer>,
    ) -> Self {
        Self {
            catalog: Arc::new(store.catalog()),
            payment_methods: Arc::new(store.payment_methods),
            issuer,
            shop_name: store.shop_name,
            config,
        }
    }

    /// Look up a configured payment method
    pub fn payment_method(&self, id: &str) -> Option<&PaymentMethodConfig> {
        self.payment_methods.iter().find(|m| m.id == id)
    }
}

/// Load the store definition, trying the workspace-relative fallbacks
fn load_store_config(path: &str) -> anyhow::Result<StoreConfig> {
    let candidates = [
        path.to_string(),
        format!("../{path}"),
        format!("../../{path}"),
    ];

    for candidate in &candidates {
        if let Ok(content) = std::fs::read_to_string(candidate) {
            let store = StoreConfig::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", candidate, e))?;
            tracing::info!(
                "Loaded {} products and {} payment methods from {}",
                store.products.len(),
                store.payment_methods.len(),
                candidate
            );
            return Ok(store);
        }
    }

    tracing::warn!("No store config found at {}, using empty store", path);
    Ok(StoreConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
            store_config: "config/store.toml".to_string(),
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
        assert!(!config.is_production());
    }

    #[test]
    fn test_bad_socket_addr() {
        let config = AppConfig {
            host: "not a host".to_string(),
            port: 3000,
            environment: "test".to_string(),
            store_config: String::new(),
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_store_from_toml() {
        let store = StoreConfig::from_toml(
            r#"
            shop_name = "Durger King"

            [[products]]
            id = "burger"
            name = "Burger"
            price = { amount = 45000, currency = "RUB" }

            [[payment_methods]]
            id = "card-1"
            title = "Card"

            [[payment_methods]]
            id = "cash"
            title = "Cash on delivery"
            requires_invoice = false
            "#,
        )
        .unwrap();

        assert_eq!(store.shop_name, "Durger King");
        assert_eq!(store.catalog().products.len(), 1);
        assert!(store.payment_methods[0].requires_invoice);
        assert!(!store.payment_methods[1].requires_invoice);
        assert_eq!(
            store.payment_methods[1].public(),
            PaymentMethod::new("cash", "Cash on delivery", "")
        );
    }

    #[test]
    fn test_duplicate_method_ids_rejected() {
        let result = StoreConfig::from_toml(
            r#"
            [[payment_methods]]
            id = "card-1"
            title = "Card"

            [[payment_methods]]
            id = "card-1"
            title = "Card again"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_product_ids_rejected() {
        let err = StoreConfig::from_toml(
            r#"
            [[products]]
            id = "burger"
            name = "Burger"
            price = { amount = 45000, currency = "RUB" }

            [[products]]
            id = "burger"
            name = "Double Burger"
            price = { amount = 60000, currency = "RUB" }
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate product id: burger"));
    }
}
