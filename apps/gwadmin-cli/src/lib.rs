//! gwadmin CLI library
//!
//! Configuration loading, logging, the department provisioning run and the
//! lifecycle batch runner behind the `gwadmin` binary.

pub mod batch;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod provisioning;

pub use error::{CliError, CliResult};
