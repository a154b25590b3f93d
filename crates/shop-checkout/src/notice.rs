//! # Notices
//!
//! Every checkout failure ends as exactly one user-visible notice.

use shop_core::{CheckoutError, ErrorKind, Notice, NoticeLevel};

/// Texts shown to the shopper. Override for localisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeTexts {
    pub order_confirmed: String,
    pub empty_cart: String,
    pub no_payment_method: String,
    pub order_failed: String,
    pub invoice_unsupported: String,
    pub payment_failed: String,
    pub payment_indeterminate: String,
    pub methods_unavailable: String,
}

impl Default for NoticeTexts {
    fn default() -> Self {
        Self {
            order_confirmed: "Your order has been placed.".to_string(),
            empty_cart: "Your cart is empty.".to_string(),
            no_payment_method: "Please choose a payment method.".to_string(),
            order_failed: "Something went wrong while placing your order. Please try again."
                .to_string(),
            invoice_unsupported:
                "Some features are unavailable. Please update your app to pay in-app.".to_string(),
            payment_failed: "Payment failed. You can try again.".to_string(),
            payment_indeterminate:
                "We could not confirm your payment yet. Check your payment status before paying again."
                    .to_string(),
            methods_unavailable: "Could not load payment methods. Please try again.".to_string(),
        }
    }
}

impl NoticeTexts {
    /// Notice for a checkout failure
    pub fn for_error(&self, err: &CheckoutError) -> Notice {
        match err {
            CheckoutError::EmptyCart => Notice::new(NoticeLevel::Warning, &self.empty_cart),
            CheckoutError::NoPaymentMethodSelected | CheckoutError::UnknownPaymentMethod { .. } => {
                Notice::new(NoticeLevel::Warning, &self.no_payment_method)
            }
            CheckoutError::InvoiceUnsupported => {
                Notice::new(NoticeLevel::Error, &self.invoice_unsupported)
            }
            CheckoutError::PaymentFailed { .. } => {
                Notice::new(NoticeLevel::Error, &self.payment_failed)
            }
            CheckoutError::PaymentIndeterminate { .. } => {
                Notice::new(NoticeLevel::Warning, &self.payment_indeterminate)
            }
            other => match other.kind() {
                ErrorKind::Validation => Notice::new(NoticeLevel::Warning, other.to_string()),
                _ => Notice::new(NoticeLevel::Error, &self.order_failed),
            },
        }
    }

    /// Notice for an order the backend confirmed without an invoice
    pub fn confirmed(&self) -> Notice {
        Notice::new(NoticeLevel::Success, &self.order_confirmed)
    }

    /// Notice for a failed payment method refresh
    pub fn for_fetch_error(&self, _err: &CheckoutError) -> Notice {
        Notice::new(NoticeLevel::Error, &self.methods_unavailable)
    }
}
