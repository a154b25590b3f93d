//! # HTTP Configuration
//!
//! Configuration for the commerce service client and the Bot API invoice
//! issuer. Secrets are loaded from environment variables.

use shop_core::CheckoutError;
use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BOT_API_BASE_URL: &str = "https://api.telegram.org";

/// Commerce service endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommerceConfig {
    /// Base URL, without a trailing slash
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl CommerceConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `COMMERCE_BASE_URL`
    ///
    /// Optional:
    /// - `COMMERCE_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok();

        let base_url = env::var("COMMERCE_BASE_URL").map_err(|_| {
            CheckoutError::Configuration("COMMERCE_BASE_URL not set".to_string())
        })?;

        let timeout_secs = match env::var("COMMERCE_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                CheckoutError::Configuration(format!(
                    "COMMERCE_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Self::new(base_url).map(|config| config.with_timeout(Duration::from_secs(timeout_secs)))
    }

    /// Create config for an explicit base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, CheckoutError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CheckoutError::Configuration(format!(
                "commerce base URL must be http(s), got {base_url:?}"
            )));
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn orders_url(&self) -> String {
        format!("{}/api/orders", self.base_url)
    }

    pub fn payment_methods_url(&self) -> String {
        format!("{}/api/payment-methods", self.base_url)
    }
}

/// Bot API configuration for issuing invoices
#[derive(Clone)]
pub struct BotConfig {
    /// Bot token (`<bot id>:<secret>`)
    pub bot_token: String,

    /// Payment provider token issued through BotFather
    pub provider_token: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `TELEGRAM_BOT_TOKEN`
    /// - `TELEGRAM_PROVIDER_TOKEN`
    ///
    /// Optional:
    /// - `TELEGRAM_API_BASE_URL`
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok();

        let bot_token = env::var("TELEGRAM_BOT_TOKEN").map_err(|_| {
            CheckoutError::Configuration("TELEGRAM_BOT_TOKEN not set".to_string())
        })?;

        let provider_token = env::var("TELEGRAM_PROVIDER_TOKEN").map_err(|_| {
            CheckoutError::Configuration("TELEGRAM_PROVIDER_TOKEN not set".to_string())
        })?;

        let mut config = Self::new(bot_token, provider_token)?;
        if let Ok(url) = env::var("TELEGRAM_API_BASE_URL") {
            config = config.with_api_base_url(url);
        }
        Ok(config)
    }

    /// Create config with explicit values
    pub fn new(
        bot_token: impl Into<String>,
        provider_token: impl Into<String>,
    ) -> Result<Self, CheckoutError> {
        let bot_token = bot_token.into();
        let provider_token = provider_token.into();

        if !is_valid_bot_token(&bot_token) {
            return Err(CheckoutError::Configuration(
                "TELEGRAM_BOT_TOKEN must look like <bot id>:<secret>".to_string(),
            ));
        }

        if provider_token.trim().is_empty() {
            return Err(CheckoutError::Configuration(
                "TELEGRAM_PROVIDER_TOKEN is empty".to_string(),
            ));
        }

        Ok(Self {
            bot_token,
            provider_token,
            api_base_url: DEFAULT_BOT_API_BASE_URL.to_string(),
        })
    }

    /// Check if the provider token targets the payment provider's test environment
    pub fn is_test_mode(&self) -> bool {
        self.provider_token.contains(":TEST:")
    }

    /// Numeric bot id, the part of the token before the colon
    pub fn bot_id(&self) -> &str {
        self.bot_token.split(':').next().unwrap_or_default()
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Full URL of a Bot API method
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base_url, self.bot_token, method)
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_id", &self.bot_id())
            .field("test_mode", &self.is_test_mode())
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

fn is_valid_bot_token(token: &str) -> bool {
    match token.split_once(':') {
        Some((id, secret)) => {
            !id.is_empty()
                && id.bytes().all(|b| b.is_ascii_digit())
                && secret.len() >= 30
                && secret
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        }
        None => false,
    }
}
