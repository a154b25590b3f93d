//! # Invoice Session
//!
//! Lifecycle of one invoice: `none → opened → {paid | failed | unknown}`.
//! A session is never reopened; a new handle always means a new session.

use shop_core::{CheckoutError, CheckoutResult, InvoiceHandle, InvoiceStatus};

/// Status of the current invoice session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    None,
    Opened,
    Paid,
    Failed,
    Unknown,
}

impl SessionStatus {
    /// Paid, failed and unknown are all terminal
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Paid | SessionStatus::Failed | SessionStatus::Unknown
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::None => "none",
            SessionStatus::Opened => "opened",
            SessionStatus::Paid => "paid",
            SessionStatus::Failed => "failed",
            SessionStatus::Unknown => "unknown",
        }
    }
}

impl From<InvoiceStatus> for SessionStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Paid => SessionStatus::Paid,
            InvoiceStatus::Failed => SessionStatus::Failed,
            InvoiceStatus::Unknown => SessionStatus::Unknown,
        }
    }
}

/// One in-flight (or finished) invoice payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceSession {
    handle: InvoiceHandle,
    status: SessionStatus,
}

impl InvoiceSession {
    /// Start a session for a freshly issued handle
    pub fn open(handle: InvoiceHandle) -> Self {
        Self {
            handle,
            status: SessionStatus::Opened,
        }
    }

    pub fn handle(&self) -> &InvoiceHandle {
        &self.handle
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Opened
    }

    /// Record the host's resolution. Only an opened session can resolve.
    pub fn resolve(&mut self, status: InvoiceStatus) -> CheckoutResult<SessionStatus> {
        let next = SessionStatus::from(status);
        if self.status != SessionStatus::Opened {
            return Err(CheckoutError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.status = next;
        Ok(next)
    }
}

/// An opened session still waiting on the host. Settling consumes it, so
/// each handle resolves exactly once.
#[derive(Debug)]
pub struct PendingInvoice {
    session: InvoiceSession,
}

impl PendingInvoice {
    pub fn new(handle: InvoiceHandle) -> Self {
        Self {
            session: InvoiceSession::open(handle),
        }
    }

    pub fn handle(&self) -> &InvoiceHandle {
        &self.session.handle
    }

    /// The session as seen while the host payment surface is open
    pub fn session(&self) -> &InvoiceSession {
        &self.session
    }

    pub fn settle(self, status: InvoiceStatus) -> InvoiceSession {
        InvoiceSession {
            handle: self.session.handle,
            status: SessionStatus::from(status),
        }
    }
}

/// Status of an optional session (`None` when no invoice was ever opened)
pub fn session_status(session: Option<&InvoiceSession>) -> SessionStatus {
    session.map(|s| s.status()).unwrap_or(SessionStatus::None)
}
