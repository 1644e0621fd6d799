//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution. Children are spawned with `kill_on_drop` so
//! an aborted run never leaves them orphaned. There are no timeouts: a run
//! waits for Terraform as long as Terraform takes.

use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::process::{ExitStatus, Output, Stdio};

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use crate::application::ports::{CommandRunner, LineStream};
use crate::domain::{Invocation, ProvisionError};

/// Lines buffered between the pipe reader and the consumer.
const LINE_BUFFER: usize = 256;

/// Production `CommandRunner` backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn command(invocation: &Invocation) -> Command {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .current_dir(&invocation.cwd)
        .stdin(Stdio::null())
        .kill_on_drop(true);
    cmd
}

impl CommandRunner for TokioCommandRunner {
    type Lines = TokioLineStream;

    async fn run(&self, invocation: &Invocation) -> Result<Output> {
        tracing::debug!(program = %invocation.program, args = ?invocation.args, "running");
        let output = command(invocation)
            .output()
            .await
            .with_context(|| format!("failed to spawn {}", invocation.program))?;
        tracing::debug!(program = %invocation.program, status = %output.status, "exited");
        Ok(output)
    }

    fn stream(&self, invocation: &Invocation, merge_stderr: bool) -> Result<TokioLineStream> {
        tracing::debug!(
            program = %invocation.program,
            args = ?invocation.args,
            merge_stderr,
            "streaming"
        );
        // One pipe for both fds keeps stdout and stderr in write order.
        let (reader, writer) = io::pipe().context("failed to create output pipe")?;
        let stderr = if merge_stderr {
            Stdio::from(writer.try_clone().context("failed to share output pipe")?)
        } else {
            Stdio::inherit()
        };
        // The command (and with it the parent's write ends) is dropped at the
        // end of this statement, so the reader sees EOF once the child exits.
        let child = command(invocation)
            .stdout(writer)
            .stderr(stderr)
            .spawn()
            .with_context(|| format!("failed to spawn {}", invocation.program))?;

        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        tokio::task::spawn_blocking(move || forward_lines(reader, &tx));

        Ok(TokioLineStream {
            program: invocation.program.clone(),
            child,
            lines: rx,
        })
    }

    async fn run_to_file(&self, invocation: &Invocation, dest: &Path) -> Result<ExitStatus> {
        let file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| ProvisionError::FileIo {
                path: dest.display().to_string(),
                detail: e.to_string(),
            })?
            .into_std()
            .await;

        tracing::debug!(
            program = %invocation.program,
            args = ?invocation.args,
            dest = %dest.display(),
            "running with stdout redirected"
        );
        let status = command(invocation)
            .stdout(Stdio::from(file))
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("failed to spawn {}", invocation.program))?;
        tracing::debug!(program = %invocation.program, %status, "exited");
        Ok(status)
    }
}

/// Read `reader` line by line into `tx` until end of stream or until the
/// receiver goes away. Invalid UTF-8 is replaced rather than ending the stream.
fn forward_lines(reader: io::PipeReader, tx: &mpsc::Sender<io::Result<String>>) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(&['\n', '\r'][..])
                    .to_string();
                if tx.blocking_send(Ok(line)).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                break;
            }
        }
    }
}

/// Line sequence of a child spawned by `TokioCommandRunner::stream`.
pub struct TokioLineStream {
    program: String,
    child: Child,
    lines: mpsc::Receiver<io::Result<String>>,
}

impl LineStream for TokioLineStream {
    async fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.recv().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e)) => Err(e).with_context(|| format!("reading output of {}", self.program)),
            None => Ok(None),
        }
    }

    async fn wait(mut self) -> Result<ExitStatus> {
        // The reader stops on a closed receiver, so an undrained pipe cannot stall the child.
        drop(self.lines);
        let status = self
            .child
            .wait()
            .await
            .with_context(|| format!("waiting for {}", self.program))?;
        tracing::debug!(program = %self.program, %status, "exited");
        Ok(status)
    }
}
