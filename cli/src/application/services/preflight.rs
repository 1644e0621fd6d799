//! Application service: preflight checks before any infrastructure changes.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::PathBuf;
use std::process::Output;

use anyhow::{Context, Result};
use semver::Version;

use crate::application::ports::{CommandRunner, HostProbe, ProgressReporter};
use crate::domain::step::{kubectl_version_query, terraform_version_query};
use crate::domain::{
    Invocation, ProvisionConfig, ProvisionError, check_credentials, meets_minimum,
    parse_client_version,
};

/// What preflight learned about the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightReport {
    pub kubectl_path: PathBuf,
    pub kubectl_version: Version,
    pub authenticator_path: PathBuf,
    /// First line of `terraform version`.
    pub terraform_version: String,
}

/// Reject positional arguments; `create` takes none.
///
/// # Errors
///
/// Returns `ProvisionError::Usage` when `args` is non-empty.
pub fn check_usage(args: &[String]) -> Result<(), ProvisionError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(ProvisionError::Usage)
    }
}

/// Run every host check in order, stopping at the first failure.
///
/// Only read-only subprocesses (`kubectl version`, `terraform version`) are
/// launched here.
///
/// # Errors
///
/// Returns the `ProvisionError` for the first check that fails.
pub async fn run_preflight(
    config: &ProvisionConfig,
    host: &impl HostProbe,
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
) -> Result<PreflightReport> {
    let kubectl_path = host.find_program(&config.kubectl).ok_or_else(|| {
        ProvisionError::MissingDependency(format!("{} not found, kindly check", config.kubectl))
    })?;
    reporter.info(&format!("Found kubectl at {}", kubectl_path.display()));

    let kubectl_version = check_kubectl_version(config, runner, reporter).await?;

    let authenticator_path = host.find_program(&config.authenticator).ok_or_else(|| {
        ProvisionError::MissingDependency(format!(
            "AWS Authenticator binary not found ({} must be in your PATH)",
            config.authenticator
        ))
    })?;

    let terraform = config.terraform_path();
    if !host.file_exists(&terraform) {
        return Err(ProvisionError::MissingDependency(format!(
            "Terraform binary not found in the installation folder ({})",
            terraform.display()
        ))
        .into());
    }
    reporter.info("Terraform binary exists in the installation folder, terraform version:");
    let output = run_checked(runner, &terraform_version_query(config), "terraform version").await?;
    let terraform_version = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    reporter.info(&terraform_version);

    if host.file_exists(&config.state_path()) {
        return Err(ProvisionError::PreexistingInstallation {
            state_file: config.state_file.display().to_string(),
        }
        .into());
    }

    reporter.step("checking AWS credentials");
    check_credentials(|name| host.env_var(name))?;

    Ok(PreflightReport {
        kubectl_path,
        kubectl_version,
        authenticator_path,
        terraform_version,
    })
}

async fn check_kubectl_version(
    config: &ProvisionConfig,
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
) -> Result<Version> {
    let output = run_checked(runner, &kubectl_version_query(config), "kubectl version").await?;
    let text = String::from_utf8_lossy(&output.stdout);
    reporter.info(text.trim());

    let installed = parse_client_version(&text).map_err(|e| ProvisionError::Subprocess {
        step: "kubectl version".to_string(),
        detail: format!("{e:#}"),
    })?;
    let minimum = config
        .min_version()
        .context("invalid minimum kubectl version")?;

    if !meets_minimum(&installed, &minimum) {
        return Err(ProvisionError::VersionIncompatible {
            installed: installed.to_string(),
            required: minimum.to_string(),
        }
        .into());
    }
    Ok(installed)
}

/// Run a capture-only command and treat launch failure and non-zero exit alike.
pub(crate) async fn run_checked(
    runner: &impl CommandRunner,
    invocation: &Invocation,
    step: &str,
) -> Result<Output> {
    let output = runner
        .run(invocation)
        .await
        .map_err(|e| ProvisionError::Subprocess {
            step: step.to_string(),
            detail: format!("{e:#}"),
        })?;
    if !output.status.success() {
        return Err(failed_status(step, output.status, &output.stderr).into());
    }
    Ok(output)
}

/// Error for a process that ran but exited unsuccessfully.
///
/// The captured stderr is surfaced verbatim; without any, the exit status is.
pub(crate) fn failed_status(
    step: &str,
    status: std::process::ExitStatus,
    stderr: &[u8],
) -> ProvisionError {
    let stderr = String::from_utf8_lossy(stderr);
    let detail = if stderr.trim().is_empty() {
        status.to_string()
    } else {
        stderr.trim_end().to_string()
    };
    ProvisionError::Subprocess {
        step: step.to_string(),
        detail,
    }
}
