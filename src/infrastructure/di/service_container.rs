//! Service container for dependency injection
//!
//! Wires up the client with its dependencies.

use std::sync::Arc;

use crate::application::services::HybridGuardClient;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{CommandRunner, FileSystem, RealCommandRunner, RealFileSystem};

/// Container holding settings and I/O boundaries.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs, cmd }
    }

    /// Build a client for the configured executable.
    ///
    /// Fails with `MissingExecutable` if `settings.binary_path` does not exist.
    pub fn client(&self) -> ApplicationResult<HybridGuardClient> {
        HybridGuardClient::with_deps(
            self.settings.binary_path.clone(),
            Arc::clone(&self.fs),
            Arc::clone(&self.cmd),
            self.settings.timeout(),
        )
    }
}
