//! CLI command implementations.

pub mod batches;
pub mod notifications;
pub mod report;
