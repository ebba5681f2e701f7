//! Reports derived from stored loan and vehicle records.
//!
//! Every builder takes plain record slices the caller has already fetched
//! and scoped to one tenant, and recomputes its report from scratch. Nothing
//! here is persisted.

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "debt")]
pub mod debt;

#[cfg(feature = "depreciation")]
pub mod depreciation;

#[cfg(feature = "dashboard")]
pub mod dashboard;
