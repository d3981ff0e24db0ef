//! Error types for the lending orders SDK
//!
//! Uses `eyre` for ergonomic error handling with context. Every precondition
//! failure raised by the translation engine carries an [`OrderError`], which can
//! be recovered from a [`Report`] with `downcast_ref` to branch on its
//! [`ErrorKind`].

pub use eyre::{eyre, Context, Report, Result};

/// Category of a failed precondition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Obligation does not have exactly one deposit / borrow where one is required
    Shape,
    /// A value lies outside of its legal range (LTV, bonus, repay amount, price)
    Range,
    /// Long vs short cannot be resolved from the stablecoin membership
    Classification,
    /// Order family, trigger, position or stored state do not fit together
    Compatibility,
    /// The order would be triggered immediately
    Timing,
    /// Raw on-chain order data cannot be interpreted
    Decode,
    /// A reserve referenced by the caller does not exist in the market
    UnknownReserve,
}

/// A descriptive, typed precondition failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct OrderError {
    kind: ErrorKind,
    message: String,
}

impl OrderError {
    /// Create a new error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The failure category
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Returns the [`ErrorKind`] of a report raised by this crate, if any
pub fn error_kind(report: &Report) -> Option<ErrorKind> {
    report.downcast_ref::<OrderError>().map(OrderError::kind)
}
