//! # Request Handlers
//!
//! Axum request handlers for the commerce service the mini-app talks to.

use crate::pricing::{OrderRejection, PricedOrder};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;
use shop_core::{OrderRequest, PaymentMethod, SubmissionBody};
use shop_http::InvoiceError;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn rejection_to_response(err: OrderRejection) -> ApiError {
    let response = ErrorResponse::new(err.to_string(), StatusCode::BAD_REQUEST.as_u16());
    (StatusCode::BAD_REQUEST, Json(response))
}

fn invoice_error_to_response(err: InvoiceError) -> ApiError {
    let response = ErrorResponse::new("Could not issue invoice", StatusCode::BAD_GATEWAY.as_u16())
        .with_details(err.to_string());
    (StatusCode::BAD_GATEWAY, Json(response))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Accept an order snapshot from the mini-app.
///
/// Answers `{ "invoiceHandle": ... }` when the payment method needs an
/// invoice (or none was chosen), `{ "confirmed": true }` otherwise.
#[instrument(skip(state, request), fields(items = request.items.len(), payment_method = ?request.payment_method_id))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> Result<Json<SubmissionBody>, ApiError> {
    let order = PricedOrder::price(&state.catalog, &request.items).map_err(|e| {
        warn!("Order rejected: {}", e);
        rejection_to_response(e)
    })?;

    let requires_invoice = match request.payment_method_id.as_deref() {
        Some(id) => {
            state
                .payment_method(id)
                .ok_or_else(|| {
                    rejection_to_response(OrderRejection::UnknownPaymentMethod(id.to_string()))
                })?
                .requires_invoice
        }
        None => true,
    };

    let order_ref = Uuid::new_v4().to_string();
    let placed_at = Utc::now();

    info!(
        "Order {} placed at {}: user={:?}, {} units, total={}, zone={:?}",
        order_ref,
        placed_at.to_rfc3339(),
        request.user_id,
        order.unit_count(),
        order.total().display(),
        request.shipping_zone
    );

    if !requires_invoice {
        info!("Order {} confirmed without invoice", order_ref);
        return Ok(Json(SubmissionBody::confirmed()));
    }

    if !request.invoice_supported {
        warn!(
            "Order {} needs an invoice but the client cannot open invoices",
            order_ref
        );
    }

    let payload = format!("{}:{}", order_ref, placed_at.timestamp());
    let draft = order.invoice_draft(&state.shop_name, &order_ref, &payload);

    let handle = state
        .issuer
        .create_invoice_link(&draft)
        .await
        .map_err(|e| {
            error!("Failed to issue invoice for order {}: {}", order_ref, e);
            invoice_error_to_response(e)
        })?;

    info!(
        "Issued {} invoice for order {}",
        state.issuer.issuer_name(),
        order_ref
    );

    Ok(Json(SubmissionBody::invoice(handle.as_str())))
}

/// Payment methods in configured order
pub async fn list_payment_methods(State(state): State<AppState>) -> Json<Vec<PaymentMethod>> {
    Json(state.payment_methods.iter().map(|m| m.public()).collect())
}

/// Active products
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let products: Vec<_> = state.catalog.active_products().collect();
    Json(serde_json::json!({
        "products": products,
        "count": products.len()
    }))
}
