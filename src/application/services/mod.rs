//! Application services
//!
//! Concrete service implementations. Services depend on I/O boundary traits
//! (FileSystem, CommandRunner) but are themselves concrete structs, not traits.

mod client;

pub use client::{HybridGuardClient, DEFAULT_BINARY_PATH};
