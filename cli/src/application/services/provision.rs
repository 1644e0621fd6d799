//! Application service: the `create` use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Steps run strictly one after another; the first failure ends the run and
//! nothing already applied is rolled back.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::application::ports::{CommandRunner, HostProbe, LineStream, ProgressReporter};
use crate::application::services::preflight::{
    PreflightReport, check_usage, failed_status, run_preflight,
};
use crate::domain::{
    Invocation, OutputPolicy, ProvisionConfig, ProvisionError, ProvisioningStep, StepKind,
    provisioning_plan,
};

/// Files written by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterCreated {
    pub preflight: PreflightReport,
    pub kubeconfig: PathBuf,
    pub config_map: PathBuf,
}

/// Validate arguments and host, then provision the cluster.
///
/// # Errors
///
/// Returns the first usage, preflight, or step failure.
pub async fn create_cluster(
    args: &[String],
    config: &ProvisionConfig,
    host: &impl HostProbe,
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
) -> Result<ClusterCreated> {
    check_usage(args)?;
    let preflight = run_preflight(config, host, runner, reporter).await?;
    provision(config, runner, reporter).await?;
    Ok(ClusterCreated {
        preflight,
        kubeconfig: config.kubeconfig_path(),
        config_map: config.config_map_path(),
    })
}

/// Execute the provisioning plan. Assumes preflight passed.
///
/// # Errors
///
/// Returns `ProvisionError::Subprocess` or `ProvisionError::FileIo` for the
/// first step that fails.
pub async fn provision(
    config: &ProvisionConfig,
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    for step in provisioning_plan(config) {
        reporter.step(&format!("starting {}", step.label));
        tracing::debug!(step = step.label, command = %step.invocation, "running step");

        if let Err(e) = execute(&step, runner, reporter).await {
            if step.kind == StepKind::Apply {
                reporter.warn(&format!(
                    "resources created before the failure are tracked in {}",
                    config.state_file.display()
                ));
            }
            return Err(e);
        }

        match (&step.kind, &step.output) {
            (StepKind::ExportKubeconfig, OutputPolicy::CaptureToFile(path)) => {
                reporter.success(&format!("kubeconfig written to {}", path.display()));
                reporter.info("To use the kubeconfig file, do the following:");
                reporter.info(&format!("export KUBECONFIG={}", path.display()));
            }
            (StepKind::ExportConfigMap, OutputPolicy::CaptureToFile(path)) => {
                reporter.success(&format!("config-map written to {}", path.display()));
            }
            _ => reporter.success(&format!("{} finished", step.label)),
        }
    }

    reporter.info(
        "Worker nodes are coming up one by one, it will take some time depending on the number of worker nodes you specified",
    );
    Ok(())
}

async fn execute(
    step: &ProvisioningStep,
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    match &step.output {
        OutputPolicy::Stream => stream(step, &step.invocation, false, runner, reporter).await,
        OutputPolicy::StreamMerged => stream(step, &step.invocation, true, runner, reporter).await,
        OutputPolicy::CaptureToFile(dest) => capture_to_file(step, dest, runner).await,
        OutputPolicy::CaptureAndPrint => capture_and_print(step, runner, reporter).await,
    }
}

async fn stream(
    step: &ProvisioningStep,
    invocation: &Invocation,
    merge_stderr: bool,
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let mut lines = runner
        .stream(invocation, merge_stderr)
        .map_err(|e| spawn_failed(step, &e))?;
    while let Some(line) = lines.next_line().await.map_err(|e| spawn_failed(step, &e))? {
        reporter.line(&line);
    }
    let status = lines.wait().await.map_err(|e| spawn_failed(step, &e))?;
    if !status.success() {
        return Err(failed_status(step.label, status, &[]).into());
    }
    Ok(())
}

async fn capture_to_file(
    step: &ProvisioningStep,
    dest: &Path,
    runner: &impl CommandRunner,
) -> Result<()> {
    let status = runner
        .run_to_file(&step.invocation, dest)
        .await
        .map_err(|e| {
            if e.is::<ProvisionError>() {
                e
            } else {
                spawn_failed(step, &e).into()
            }
        })?;
    if !status.success() {
        return Err(failed_status(step.label, status, &[]).into());
    }
    Ok(())
}

async fn capture_and_print(
    step: &ProvisioningStep,
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let output = runner
        .run(&step.invocation)
        .await
        .map_err(|e| spawn_failed(step, &e))?;
    if !output.status.success() {
        return Err(failed_status(step.label, output.status, &output.stderr).into());
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    for line in stdout.lines().chain(stderr.lines()) {
        reporter.line(line);
    }
    Ok(())
}

fn spawn_failed(step: &ProvisioningStep, err: &anyhow::Error) -> ProvisionError {
    ProvisionError::Subprocess {
        step: step.label.to_string(),
        detail: format!("{err:#}"),
    }
}
