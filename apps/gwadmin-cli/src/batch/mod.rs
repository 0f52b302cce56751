//! Batch operations module for CLI bulk operations
//!
//! Lifecycle actions over a list of accounts, and the result types shared
//! with the provisioning run.

pub mod lifecycle;
pub mod result;

pub use lifecycle::{parse_identifiers, read_identifiers, run_lifecycle, BatchEntry, LifecycleAction};
pub use result::{BatchItemResult, BatchItemStatus, BatchResult};
