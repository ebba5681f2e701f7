pub mod engine;
pub mod error;
pub mod records;
pub mod schedules;
pub mod types;

pub use error::FleetFinanceError;
pub use types::*;

/// Standard result type for all fleet-finance operations
pub type FleetFinanceResult<T> = Result<T, FleetFinanceError>;
