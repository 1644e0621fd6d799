//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::Invocation;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Output of a running process, exposed one line at a time.
///
/// The sequence is finite and not restartable: it ends when the process
/// closes its output pipes. Exit status is collected separately with `wait`.
#[allow(async_fn_in_trait)]
pub trait LineStream {
    /// Next line without its terminator, or `None` once the output closed.
    async fn next_line(&mut self) -> Result<Option<String>>;
    /// Wait for the process to exit.
    async fn wait(self) -> Result<ExitStatus>;
}

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    type Lines: LineStream;

    /// Run a program to completion and capture stdout and stderr.
    async fn run(&self, invocation: &Invocation) -> Result<Output>;
    /// Spawn a program and stream its stdout line by line.
    ///
    /// With `merge_stderr`, stderr lines are interleaved into the same
    /// sequence in arrival order.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn stream(&self, invocation: &Invocation, merge_stderr: bool) -> Result<Self::Lines>;
    /// Run a program with stdout redirected into a newly created `dest`,
    /// truncating any existing file, and wait for it to exit.
    async fn run_to_file(&self, invocation: &Invocation, dest: &Path) -> Result<ExitStatus>;
}

// ── Host Probe Port ───────────────────────────────────────────────────────────

/// Read-only view of the host used by preflight checks.
pub trait HostProbe {
    /// Resolve a program on the search path.
    fn find_program(&self, name: &str) -> Option<PathBuf>;
    /// Whether a file or directory exists at `path`.
    fn file_exists(&self, path: &Path) -> bool;
    /// Value of an environment variable, `None` when unset.
    fn env_var(&self, name: &str) -> Option<String>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait; no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an informational message.
    fn info(&self, message: &str);
    /// Forward one line of subprocess output verbatim.
    fn line(&self, line: &str);
}
