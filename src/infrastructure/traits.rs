//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing the client
//! to be tested with mock implementations.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::infrastructure::{InfraError, InfraResult};

/// Interval between exit checks of a time-bounded child.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with a discrete argument vector and capture its output.
    ///
    /// With a `timeout`, the child is killed once it elapses and
    /// `InfraError::Timeout` is returned.
    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        timeout: Option<Duration>,
    ) -> InfraResult<Output>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        timeout: Option<Duration>,
    ) -> InfraResult<Output> {
        match timeout {
            None => Command::new(program)
                .args(args)
                .output()
                .map_err(|source| InfraError::Spawn {
                    program: program.to_path_buf(),
                    source,
                }),
            Some(limit) => run_bounded(program, args, limit),
        }
    }
}

/// Run with a deadline.
///
/// Streams go to anonymous temp files rather than pipes so a chatty child
/// cannot block on a full pipe while we poll it.
fn run_bounded(program: &Path, args: &[OsString], timeout: Duration) -> InfraResult<Output> {
    let mut stdout_file =
        tempfile::tempfile().map_err(|e| InfraError::io("create stdout capture", e))?;
    let mut stderr_file =
        tempfile::tempfile().map_err(|e| InfraError::io("create stderr capture", e))?;

    let child_stdout = stdout_file
        .try_clone()
        .map_err(|e| InfraError::io("clone stdout capture", e))?;
    let child_stderr = stderr_file
        .try_clone()
        .map_err(|e| InfraError::io("clone stderr capture", e))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(child_stdout))
        .stderr(Stdio::from(child_stderr))
        .spawn()
        .map_err(|source| InfraError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if started.elapsed() >= timeout {
                    debug!(
                        "run_bounded: killing {} after {:?}",
                        program.display(),
                        timeout
                    );
                    if let Err(e) = child.kill() {
                        debug!("run_bounded: kill {} failed: {}", program.display(), e);
                    }
                    if let Err(e) = child.wait() {
                        debug!("run_bounded: reap {} failed: {}", program.display(), e);
                    }
                    return Err(InfraError::Timeout {
                        program: program.to_path_buf(),
                        timeout,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(InfraError::io(
                    format!("wait for {}", program.display()),
                    e,
                ))
            }
        }
    };
    trace!("run_bounded: exited after {:?}", started.elapsed());

    Ok(Output {
        status,
        stdout: read_capture(&mut stdout_file).map_err(|e| InfraError::io("read stdout", e))?,
        stderr: read_capture(&mut stderr_file).map_err(|e| InfraError::io("read stderr", e))?,
    })
}

fn read_capture(file: &mut File) -> io::Result<Vec<u8>> {
    file.seek(SeekFrom::Start(0))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(buf)
}
