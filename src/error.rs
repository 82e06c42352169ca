//! Error types for amortization, projection and assumption loading

use thiserror::Error;

/// Errors raised by the projection engine and its loaders
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// Loan terms that cannot produce a schedule (zero periods, negative rate)
    #[error("invalid amortization schedule: {0}")]
    InvalidSchedule(String),

    /// Prepayment series whose length is neither 0, 1 nor the payment count
    #[error("prepayment series has {actual} entries, expected 0, 1 or {expected}")]
    PrepaymentLengthMismatch { expected: usize, actual: usize },

    /// Required assumption key absent from the input
    #[error("missing assumption: {field}")]
    MissingAssumption { field: String },

    /// Assumption present but not usable (unparseable number, unknown class)
    #[error("invalid assumption {field}: {value:?}")]
    InvalidAssumption { field: String, value: String },

    /// No real root for the cash-flow vector in the search range
    #[error("IRR not found for {context} cash flows")]
    IrrNotFound { context: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
