//! hgclient: process-mediated client for the `hybridguard` encryption executable.
//!
//! All cryptography, key handling and file formats live in the external
//! executable. This crate validates that the executable exists, builds an
//! argument vector per operation, runs it synchronously and turns the exit
//! status and captured streams into a result.
//!
//! ```no_run
//! use std::path::Path;
//! use hgclient::HybridGuardClient;
//!
//! let client = HybridGuardClient::new("./target/release/hybridguard")?;
//! println!("{}", client.get_status());
//! let ok = client.encrypt(Path::new("secret.txt"), Path::new("secret.enc"), None);
//! # Ok::<(), hgclient::ApplicationError>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::{HybridGuardClient, DEFAULT_BINARY_PATH};
pub use application::{ApplicationError, ApplicationResult};
pub use domain::{Operation, OperationRequest, ProcessOutcome};
