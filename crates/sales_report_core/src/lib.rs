//! Shared sales report domain primitives.
//!
//! This crate owns order parsing, the per-location aggregation, and the
//! response contracts. It intentionally excludes HTTP, Lambda runtime, and
//! document store concerns.

pub mod aggregation;
pub mod contract;
pub mod paging;
