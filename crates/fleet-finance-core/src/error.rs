use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetFinanceError {
    #[error("Invalid term: {term_months} months (must be at least 1)")]
    InvalidTerm { term_months: u32 },

    #[error("Invalid useful life: {years} years (must be at least 1)")]
    InvalidUsefulLife { years: u32 },

    #[error("Invalid interest rate: {rate}% (must not be negative)")]
    InvalidRate { rate: Decimal },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FleetFinanceError {
    fn from(e: serde_json::Error) -> Self {
        FleetFinanceError::SerializationError(e.to_string())
    }
}
