// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark process runner.
//!
//! Spawns the extracted benchmark, redirects its stdout into the result file
//! and measures wall-clock time from just before spawn to observed exit.
//! Blocks for the whole run; there is no timeout.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::error::ExecutionError;

/// What a finished benchmark run left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub executable: PathBuf,
    pub result_path: PathBuf,
    pub elapsed: Duration,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
}

/// Runs the benchmark executable to completion.
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Run `executable`, capturing stdout into `result_file` (truncated first).
    ///
    /// An abnormal exit is recorded in the returned [`RunRecord`] and is not an
    /// error; the result file is produced regardless of exit status.
    ///
    /// # Errors
    /// Returns ExecutionError if the executable is missing or cannot be started.
    pub fn run(executable: &Path, result_file: &Path) -> Result<RunRecord, ExecutionError> {
        if !executable.is_file() {
            return Err(ExecutionError::NotFound {
                path: executable.to_path_buf(),
            });
        }

        let stdout = File::create(result_file).map_err(|e| ExecutionError::ResultFile {
            path: result_file.to_path_buf(),
            source: e,
        })?;

        let start = Instant::now();

        let mut child = Command::new(executable)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                discard_result_file(result_file);
                ExecutionError::SpawnFailed {
                    path: executable.to_path_buf(),
                    reason: e.to_string(),
                }
            })?;

        let pid = child.id();
        tracing::debug!(pid = pid, executable = %executable.display(), "Spawned benchmark process");

        let status = child.wait().map_err(|e| ExecutionError::Wait {
            pid,
            reason: e.to_string(),
        })?;
        let elapsed = start.elapsed();

        if status.success() {
            tracing::info!(
                pid = pid,
                elapsed_secs = elapsed.as_secs(),
                "Benchmark process exited successfully"
            );
        } else {
            tracing::warn!(
                pid = pid,
                status = %describe_status(&status),
                elapsed_secs = elapsed.as_secs(),
                "Benchmark process exited abnormally; keeping captured output"
            );
        }

        Ok(RunRecord {
            executable: executable.to_path_buf(),
            result_path: result_file.to_path_buf(),
            elapsed,
            exit_code: status.code(),
            success: status.success(),
        })
    }
}

fn discard_result_file(result_file: &Path) {
    if let Err(e) = std::fs::remove_file(result_file) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %result_file.display(), error = %e, "Failed to remove empty result file");
        }
    }
}

fn describe_status(status: &ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exit code {}", code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("signal {}", signal);
        }
    }

    "unknown status".to_string()
}

/// Render a duration as `"{m} minutes {s} seconds"`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{} minutes {} seconds", total / 60, total % 60)
}
