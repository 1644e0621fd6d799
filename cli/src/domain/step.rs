//! The provisioning plan: which processes run, in which order, and what
//! happens to their output.

use std::fmt;
use std::path::PathBuf;

use crate::domain::config::ProvisionConfig;

/// A single external process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory for the child process.
    pub cwd: PathBuf,
}

impl Invocation {
    /// Build an invocation of `program` with `args`, run from `cwd`.
    pub fn new<I, S>(program: impl Into<String>, args: I, cwd: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.into(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How a step's output reaches the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPolicy {
    /// Stdout is printed line by line while the process runs.
    Stream,
    /// Stderr is merged into stdout and printed line by line.
    StreamMerged,
    /// Stdout is redirected into a newly created file; overwritten if present.
    CaptureToFile(PathBuf),
    /// Combined output is captured and printed after the process exits.
    CaptureAndPrint,
}

/// Identifies a step so the orchestrator can attach follow-up messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Init,
    Apply,
    ExportKubeconfig,
    ExportConfigMap,
    RegisterWorkers,
}

/// One entry of the provisioning plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningStep {
    pub kind: StepKind,
    /// Human-readable name used in progress and error messages.
    pub label: &'static str,
    pub invocation: Invocation,
    /// Where the process output goes.
    pub output: OutputPolicy,
}

fn terraform(config: &ProvisionConfig, args: &[&str]) -> Invocation {
    Invocation::new(
        config.terraform_path().to_string_lossy(),
        args.iter().copied(),
        config.working_dir.clone(),
    )
}

/// `kubectl version --client --short`
#[must_use]
pub fn kubectl_version_query(config: &ProvisionConfig) -> Invocation {
    Invocation::new(
        config.kubectl.clone(),
        ["version", "--client", "--short"],
        config.working_dir.clone(),
    )
}

/// `terraform version`, informational only.
#[must_use]
pub fn terraform_version_query(config: &ProvisionConfig) -> Invocation {
    terraform(config, &["version"])
}

/// The fixed, totally ordered provisioning sequence.
#[must_use]
pub fn provisioning_plan(config: &ProvisionConfig) -> Vec<ProvisioningStep> {
    let kubeconfig = config.kubeconfig_path();
    let config_map = config.config_map_path();

    vec![
        ProvisioningStep {
            kind: StepKind::Init,
            label: "terraform init",
            invocation: terraform(config, &["init"]),
            output: OutputPolicy::Stream,
        },
        ProvisioningStep {
            kind: StepKind::Apply,
            label: "terraform apply",
            invocation: terraform(config, &["apply", "-auto-approve"]),
            output: OutputPolicy::StreamMerged,
        },
        ProvisioningStep {
            kind: StepKind::ExportKubeconfig,
            label: "exporting kubeconfig file to the installation folder",
            invocation: terraform(config, &["output", "kubeconfig"]),
            output: OutputPolicy::CaptureToFile(kubeconfig.clone()),
        },
        ProvisioningStep {
            kind: StepKind::ExportConfigMap,
            label: "exporting worker nodes config-map to the installation folder",
            invocation: terraform(config, &["output", "config-map"]),
            output: OutputPolicy::CaptureToFile(config_map.clone()),
        },
        ProvisioningStep {
            kind: StepKind::RegisterWorkers,
            label: "creating worker nodes",
            invocation: Invocation::new(
                config.kubectl.clone(),
                [
                    "--kubeconfig".to_string(),
                    kubeconfig.to_string_lossy().into_owned(),
                    "apply".to_string(),
                    "-f".to_string(),
                    config_map.to_string_lossy().into_owned(),
                ],
                config.working_dir.clone(),
            ),
            output: OutputPolicy::CaptureAndPrint,
        },
    ]
}
