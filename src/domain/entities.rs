//! Domain entities: core data structures

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::DomainError;

/// Input file flag understood by the external executable.
pub const INPUT_FLAG: &str = "-i";
/// Output file flag.
pub const OUTPUT_FLAG: &str = "-o";
/// Key file flag.
pub const KEY_FLAG: &str = "-k";

/// Subcommand of the external executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Encrypt,
    Decrypt,
    Keygen,
    Status,
}

impl Operation {
    /// All operations, in protocol table order.
    pub const ALL: [Operation; 4] = [
        Operation::Encrypt,
        Operation::Decrypt,
        Operation::Keygen,
        Operation::Status,
    ];

    /// Subcommand word passed as the first argument.
    pub fn subcommand(&self) -> &'static str {
        match self {
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
            Operation::Keygen => "keygen",
            Operation::Status => "status",
        }
    }

    /// Human label used in failure diagnostics, e.g. "Encryption failed: ...".
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Encrypt => "Encryption",
            Operation::Decrypt => "Decryption",
            Operation::Keygen => "Key generation",
            Operation::Status => "Status check",
        }
    }

    fn requires_input(&self) -> bool {
        matches!(self, Operation::Encrypt | Operation::Decrypt)
    }

    fn requires_output(&self) -> bool {
        !matches!(self, Operation::Status)
    }

    fn accepts_key(&self) -> bool {
        matches!(self, Operation::Encrypt | Operation::Decrypt)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subcommand())
    }
}

/// One invocation of the external executable.
///
/// Built fresh per call and validated on construction, so a request that
/// exists always satisfies the argument rules of its operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    operation: Operation,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    key: Option<PathBuf>,
}

impl OperationRequest {
    /// Validate and build a request.
    pub fn new(
        operation: Operation,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        key: Option<PathBuf>,
    ) -> Result<Self, DomainError> {
        match (operation.requires_input(), input.is_some()) {
            (true, false) => {
                return Err(DomainError::MissingArgument {
                    operation,
                    argument: "an input path",
                })
            }
            (false, true) => {
                return Err(DomainError::UnexpectedArgument {
                    operation,
                    argument: "an input path",
                })
            }
            _ => {}
        }
        match (operation.requires_output(), output.is_some()) {
            (true, false) => {
                return Err(DomainError::MissingArgument {
                    operation,
                    argument: "an output path",
                })
            }
            (false, true) => {
                return Err(DomainError::UnexpectedArgument {
                    operation,
                    argument: "an output path",
                })
            }
            _ => {}
        }
        if key.is_some() && !operation.accepts_key() {
            return Err(DomainError::UnexpectedArgument {
                operation,
                argument: "a key path",
            });
        }

        Ok(Self {
            operation,
            input,
            output,
            key,
        })
    }

    pub fn encrypt(input: &Path, output: &Path, key: Option<&Path>) -> Self {
        Self {
            operation: Operation::Encrypt,
            input: Some(input.to_path_buf()),
            output: Some(output.to_path_buf()),
            key: key.map(Path::to_path_buf),
        }
    }

    pub fn decrypt(input: &Path, output: &Path, key: Option<&Path>) -> Self {
        Self {
            operation: Operation::Decrypt,
            input: Some(input.to_path_buf()),
            output: Some(output.to_path_buf()),
            key: key.map(Path::to_path_buf),
        }
    }

    pub fn keygen(output: &Path) -> Self {
        Self {
            operation: Operation::Keygen,
            input: None,
            output: Some(output.to_path_buf()),
            key: None,
        }
    }

    pub fn status() -> Self {
        Self {
            operation: Operation::Status,
            input: None,
            output: None,
            key: None,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn key(&self) -> Option<&Path> {
        self.key.as_deref()
    }

    /// Argument vector: subcommand first, then `-i`, `-o`, `-k` for present paths.
    ///
    /// Paths are kept as `OsString` so non-UTF-8 names reach the process untouched.
    pub fn args(&self) -> Vec<OsString> {
        let mut args = vec![OsString::from(self.operation.subcommand())];
        for (flag, value) in [
            (INPUT_FLAG, &self.input),
            (OUTPUT_FLAG, &self.output),
            (KEY_FLAG, &self.key),
        ] {
            if let Some(path) = value {
                args.push(OsString::from(flag));
                args.push(path.clone().into_os_string());
            }
        }
        args
    }
}

/// Exit status of one process run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    pub success: bool,
    /// None when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Captured result of one run of the external executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.status.success
    }
}

impl From<std::process::Output> for ProcessOutcome {
    fn from(output: std::process::Output) -> Self {
        Self {
            status: output.status.into(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Returns the input unchanged if expansion fails (e.g. undefined variable).
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
