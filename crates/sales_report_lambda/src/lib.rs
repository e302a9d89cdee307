//! Lambda integration for the sales-by-location report.
//!
//! This crate owns runtime integration details (environment configuration,
//! the Appwrite document store adapter, location resolution, and the request
//! handler). Aggregation and response contracts live in `sales_report_core`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod location;
pub mod logging;
