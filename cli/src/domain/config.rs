//! Provisioning configuration schema.
//!
//! Pure types only: loading from the environment lives in `crate::infra::config`.

use std::path::{Path, PathBuf};

use semver::Version;
use serde::Deserialize;

use crate::domain::version::MIN_KUBECTL_VERSION;

/// Where the external tools and generated files live.
///
/// Every field has a default, so an empty environment yields the layout the
/// bundled Terraform configuration expects. Relative paths resolve against
/// `working_dir`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Installation folder holding the Terraform configuration.
    pub working_dir: PathBuf,
    /// kubectl program name or path, resolved on the search path.
    pub kubectl: String,
    /// IAM authenticator program name, resolved on the search path.
    pub authenticator: String,
    /// Terraform binary shipped in the installation folder.
    pub terraform: PathBuf,
    /// Terraform state file whose presence means a cluster already exists.
    pub state_file: PathBuf,
    /// Generated cluster-access configuration.
    pub kubeconfig_file: PathBuf,
    /// Generated worker-node `aws-auth` config map.
    pub config_map_file: PathBuf,
    /// Minimum accepted kubectl client version.
    pub min_kubectl_version: String,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            kubectl: "kubectl".to_string(),
            authenticator: "aws-iam-authenticator".to_string(),
            terraform: PathBuf::from("terraform"),
            state_file: PathBuf::from("terraform.tfstate"),
            kubeconfig_file: PathBuf::from("kubeconfig"),
            config_map_file: PathBuf::from("config-map-aws-auth.yaml"),
            min_kubectl_version: MIN_KUBECTL_VERSION.to_string(),
        }
    }
}

impl ProvisionConfig {
    /// Resolve `path` against the working directory.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.working_dir.join(path)
    }

    #[must_use]
    pub fn terraform_path(&self) -> PathBuf {
        self.resolve(&self.terraform)
    }

    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.resolve(&self.state_file)
    }

    #[must_use]
    pub fn kubeconfig_path(&self) -> PathBuf {
        self.resolve(&self.kubeconfig_file)
    }

    #[must_use]
    pub fn config_map_path(&self) -> PathBuf {
        self.resolve(&self.config_map_file)
    }

    /// Parsed minimum kubectl version.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_kubectl_version` is not a semantic version.
    pub fn min_version(&self) -> Result<Version, semver::Error> {
        Version::parse(self.min_kubectl_version.trim_start_matches('v'))
    }
}
