//! # Commerce Service Client
//!
//! Order Submission Client and payment method fetcher over HTTP.
//! Transport failures become `Network`, non-2xx statuses become `Backend`
//! and undecodable bodies become `MalformedResponse`.

use crate::config::CommerceConfig;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shop_core::{
    CheckoutError, CheckoutResult, OrderBackend, OrderRequest, PaymentMethod,
    PaymentMethodSource, SubmissionBody, SubmissionResponse,
};
use tracing::{debug, error, info, instrument};

/// HTTP client for the commerce service
#[derive(Debug, Clone)]
pub struct CommerceClient {
    config: CommerceConfig,
    client: Client,
}

impl CommerceClient {
    /// Create a client for `config`
    pub fn new(config: CommerceConfig) -> CheckoutResult<Self> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.timeout);

        let client = builder
            .build()
            .map_err(|e| CheckoutError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Self::new(CommerceConfig::from_env()?)
    }

    pub fn config(&self) -> &CommerceConfig {
        &self.config
    }

    /// Submit an order snapshot
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn submit(&self, request: &OrderRequest) -> CheckoutResult<SubmissionResponse> {
        let response = self
            .client
            .post(self.config.orders_url())
            .json(request)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let body: SubmissionBody = read_json(response).await?;
        let outcome = SubmissionResponse::try_from(body)?;

        match &outcome {
            SubmissionResponse::Confirmed => info!("order confirmed by commerce service"),
            SubmissionResponse::Invoice(handle) => info!(invoice = %handle, "invoice issued"),
        }
        Ok(outcome)
    }

    /// Fetch the payment methods, in service order
    #[instrument(skip(self))]
    pub async fn payment_methods(&self) -> CheckoutResult<Vec<PaymentMethod>> {
        let response = self
            .client
            .get(self.config.payment_methods_url())
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let methods: Vec<PaymentMethod> = read_json(response).await?;
        debug!(count = methods.len(), "payment methods fetched");
        Ok(methods)
    }
}

#[async_trait(?Send)]
impl OrderBackend for CommerceClient {
    async fn submit_order(&self, request: &OrderRequest) -> CheckoutResult<SubmissionResponse> {
        self.submit(request).await
    }
}

#[async_trait(?Send)]
impl PaymentMethodSource for CommerceClient {
    async fn fetch_payment_methods(&self) -> CheckoutResult<Vec<PaymentMethod>> {
        self.payment_methods().await
    }
}

/// Error body returned by the commerce service
#[derive(Debug, Deserialize)]
struct ServiceError {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

async fn read_json<T: DeserializeOwned>(response: Response) -> CheckoutResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CheckoutError::Network(e.to_string()))?;

    if !status.is_success() {
        error!(status = status.as_u16(), body = %body, "commerce service error");
        let message = match serde_json::from_str::<ServiceError>(&body) {
            Ok(ServiceError {
                error,
                details: Some(details),
            }) => format!("{error}: {details}"),
            Ok(ServiceError { error, .. }) => error,
            Err(_) => format!("HTTP {status}: {body}"),
        };
        return Err(CheckoutError::Backend {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| CheckoutError::MalformedResponse(e.to_string()))
}
