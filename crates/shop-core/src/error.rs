//! # Checkout Error Types
//!
//! Typed error handling for the storefront checkout.
//! All checkout operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Cart snapshot had no items
    #[error("Cart is empty")]
    EmptyCart,

    /// Flow requires an explicit payment method and none is selected
    #[error("No payment method selected")]
    NoPaymentMethodSelected,

    /// Selected id is not in the last fetched method list
    #[error("Unknown payment method: {method_id}")]
    UnknownPaymentMethod { method_id: String },

    /// Event is only meaningful in order mode
    #[error("Not in order mode")]
    NotInOrderMode,

    /// A submission is already in flight
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Network/HTTP error talking to the commerce backend
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status
    #[error("Backend error [{status}]: {message}")]
    Backend { status: u16, message: String },

    /// Backend answered with a body we could not interpret
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Backend issued an invoice but the host cannot open invoices
    #[error("Host does not support invoices")]
    InvoiceUnsupported,

    /// Host payment surface reported an explicit decline
    #[error("Payment failed for invoice {handle}")]
    PaymentFailed { handle: String },

    /// Host payment surface gave no definitive signal
    #[error("Payment state unknown for invoice {handle}")]
    PaymentIndeterminate { handle: String },

    /// Invoice session was asked to leave a terminal state
    #[error("Invalid invoice transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Coarse classification used for user notices and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// User-correctable, no network call was made
    Validation,
    /// Failed before any server-side effect, retry allowed
    Network,
    /// Explicit decline, retry allowed
    PaymentFailed,
    /// Needs manual reconciliation
    PaymentIndeterminate,
    /// Programming or configuration fault
    Internal,
}

impl CheckoutError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckoutError::EmptyCart
            | CheckoutError::NoPaymentMethodSelected
            | CheckoutError::UnknownPaymentMethod { .. }
            | CheckoutError::NotInOrderMode
            | CheckoutError::SubmissionInFlight => ErrorKind::Validation,
            CheckoutError::Network(_)
            | CheckoutError::Backend { .. }
            | CheckoutError::MalformedResponse(_)
            | CheckoutError::InvoiceUnsupported => ErrorKind::Network,
            CheckoutError::PaymentFailed { .. } => ErrorKind::PaymentFailed,
            CheckoutError::PaymentIndeterminate { .. } => ErrorKind::PaymentIndeterminate,
            CheckoutError::InvalidTransition { .. } | CheckoutError::Configuration(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Returns true if the shopper can fix this without a retry
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Returns true if re-submitting may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckoutError::Network(_)
                | CheckoutError::MalformedResponse(_)
                | CheckoutError::PaymentFailed { .. }
                | CheckoutError::PaymentIndeterminate { .. }
        ) || matches!(self, CheckoutError::Backend { status, .. } if *status >= 500)
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors() {
        assert!(CheckoutError::EmptyCart.is_validation());
        assert!(CheckoutError::NoPaymentMethodSelected.is_validation());
        assert!(!CheckoutError::Network("timeout".into()).is_validation());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(CheckoutError::Network("timeout".into()).is_retryable());
        assert!(CheckoutError::Backend {
            status: 503,
            message: "unavailable".into()
        }
        .is_retryable());
        assert!(!CheckoutError::Backend {
            status: 400,
            message: "bad".into()
        }
        .is_retryable());
        assert!(!CheckoutError::EmptyCart.is_retryable());
    }

    #[test]
    fn test_payment_kinds() {
        assert_eq!(
            CheckoutError::PaymentFailed { handle: "inv".into() }.kind(),
            ErrorKind::PaymentFailed
        );
        assert_eq!(
            CheckoutError::PaymentIndeterminate { handle: "inv".into() }.kind(),
            ErrorKind::PaymentIndeterminate
        );
    }
}
