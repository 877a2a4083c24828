//! HybridGuard command client
//!
//! Every operation is one blocking run of the external `hybridguard`
//! executable. The client builds the argument vector, runs the process and
//! maps its exit status and captured streams to a caller-facing result.
//! It never looks at file contents or key material.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Operation, OperationRequest, ProcessOutcome};
use crate::infrastructure::traits::{CommandRunner, FileSystem, RealCommandRunner, RealFileSystem};
use crate::infrastructure::InfraError;

/// Conventional build output location of the executable.
pub const DEFAULT_BINARY_PATH: &str = "./target/release/hybridguard";

/// Client handle for the external encryption executable.
///
/// Immutable after construction; share it across threads freely, each call
/// spawns its own process.
#[derive(Clone)]
pub struct HybridGuardClient {
    binary_path: PathBuf,
    cmd: Arc<dyn CommandRunner>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for HybridGuardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridGuardClient")
            .field("binary_path", &self.binary_path)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HybridGuardClient {
    /// Create a client for the executable at `binary_path`.
    ///
    /// # Errors
    /// `ApplicationError::MissingExecutable` if the path does not exist.
    /// Whether the file can actually be executed is only discovered on first use.
    pub fn new(binary_path: impl Into<PathBuf>) -> ApplicationResult<Self> {
        Self::with_deps(
            binary_path,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            None,
        )
    }

    /// Create a client for [`DEFAULT_BINARY_PATH`].
    pub fn default_location() -> ApplicationResult<Self> {
        Self::new(DEFAULT_BINARY_PATH)
    }

    /// Create a client with custom dependencies (for testing).
    pub fn with_deps(
        binary_path: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        timeout: Option<Duration>,
    ) -> ApplicationResult<Self> {
        let binary_path = binary_path.into();
        debug!("with_deps: binary_path={}", binary_path.display());

        if !fs.exists(&binary_path) {
            return Err(ApplicationError::MissingExecutable(binary_path));
        }
        if !fs.is_file(&binary_path) {
            warn!("not a regular file: {}", binary_path.display());
        }

        Ok(Self {
            binary_path,
            cmd,
            timeout,
        })
    }

    /// Same client, with every run bounded by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run one request and return its outcome.
    ///
    /// A non-zero exit is an `InvocationFailed` error carrying stderr; a
    /// launch failure or timeout maps to its own variant. Only a successful
    /// exit yields `Ok`.
    pub fn execute(&self, request: &OperationRequest) -> ApplicationResult<ProcessOutcome> {
        let operation = request.operation();
        let args = request.args();
        debug!("execute: {} {:?}", self.binary_path.display(), args);

        let output = self
            .cmd
            .run(&self.binary_path, &args, self.timeout)
            .map_err(|e| Self::invocation_error(operation, e))?;
        let outcome = ProcessOutcome::from(output);
        debug!("execute: {} -> {}", operation, outcome.status);

        if !outcome.success() {
            return Err(ApplicationError::InvocationFailed {
                operation,
                status: outcome.status,
                stderr: outcome.stderr,
            });
        }
        Ok(outcome)
    }

    fn invocation_error(operation: Operation, err: InfraError) -> ApplicationError {
        match err {
            InfraError::Spawn { program, source } => ApplicationError::SpawnFailed {
                operation,
                program,
                source,
            },
            InfraError::Timeout { timeout, .. } => {
                ApplicationError::TimedOut { operation, timeout }
            }
            other => ApplicationError::OperationFailed {
                context: format!("run {operation}"),
                source: Box::new(other),
            },
        }
    }

    pub fn try_encrypt(
        &self,
        input: &Path,
        output: &Path,
        key: Option<&Path>,
    ) -> ApplicationResult<ProcessOutcome> {
        self.execute(&OperationRequest::encrypt(input, output, key))
    }

    pub fn try_decrypt(
        &self,
        input: &Path,
        output: &Path,
        key: Option<&Path>,
    ) -> ApplicationResult<ProcessOutcome> {
        self.execute(&OperationRequest::decrypt(input, output, key))
    }

    pub fn try_generate_key(&self, output: &Path) -> ApplicationResult<ProcessOutcome> {
        self.execute(&OperationRequest::keygen(output))
    }

    /// Status text from stdout, or the failure as an error.
    pub fn try_status(&self) -> ApplicationResult<String> {
        self.execute(&OperationRequest::status())
            .map(|outcome| outcome.stdout)
    }

    /// Encrypt `input` into `output`, optionally with an explicit key file.
    ///
    /// Returns `true` iff the executable exited successfully. On failure the
    /// captured stderr is logged at error level; use [`Self::try_encrypt`]
    /// to get it as a value.
    pub fn encrypt(&self, input: &Path, output: &Path, key: Option<&Path>) -> bool {
        Self::report(Operation::Encrypt, self.try_encrypt(input, output, key))
    }

    /// Decrypt `input` into `output`. Same contract as [`Self::encrypt`].
    pub fn decrypt(&self, input: &Path, output: &Path, key: Option<&Path>) -> bool {
        Self::report(Operation::Decrypt, self.try_decrypt(input, output, key))
    }

    /// Have the executable write a new key to `output`.
    pub fn generate_key(&self, output: &Path) -> bool {
        Self::report(Operation::Keygen, self.try_generate_key(output))
    }

    /// Status text of the executable.
    ///
    /// Always returns text: stdout on success, otherwise
    /// `"Status check failed: <stderr>"`.
    pub fn get_status(&self) -> String {
        match self.try_status() {
            Ok(text) => text,
            Err(e) => format!("{} failed: {}", Operation::Status.label(), e.diagnostic()),
        }
    }

    fn report(operation: Operation, result: ApplicationResult<ProcessOutcome>) -> bool {
        match result {
            Ok(_) => true,
            Err(e) => {
                error!("{} failed: {}", operation.label(), e.diagnostic());
                false
            }
        }
    }
}
