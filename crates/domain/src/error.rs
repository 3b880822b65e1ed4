//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`SalonError`]
//! via `From` at the port boundary.

/// Client-side validation failures. Raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("year {year} is outside {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("vin must be 17 characters of A-Z (without I, O, Q) or 0-9")]
    InvalidVin,

    #[error("price must not be negative")]
    NegativePrice,

    #[error("horse power must be at least 1")]
    HorsePowerTooLow,

    #[error("leasing must last at least one month")]
    LeasingMonthsTooLow,

    #[error("down payment must not be negative")]
    NegativeDownPayment,
}

/// A lookup that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Base error for every salon operation.
#[derive(Debug, thiserror::Error)]
pub enum SalonError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// No session, or the session expired.
    #[error("not logged in")]
    Unauthorized,

    /// Logged in, but the account may not perform the operation.
    #[error("operation not permitted")]
    Forbidden,

    /// The server understood the request and refused it.
    #[error("rejected by server: {0}")]
    Rejected(String),

    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}
