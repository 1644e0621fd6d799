//! Loads `ProvisionConfig` from `EKSCLUSTER_*` environment variables.

use anyhow::{Context, Result};

use crate::domain::ProvisionConfig;

/// Prefix shared by every configuration variable.
pub const ENV_PREFIX: &str = "EKSCLUSTER_";

/// Load configuration from the process environment.
///
/// # Errors
///
/// Returns an error if a variable cannot be deserialized, the minimum
/// kubectl version is not semver, or the working directory cannot be made
/// absolute.
pub fn load() -> Result<ProvisionConfig> {
    let vars = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
    load_from(vars)
}

/// Load configuration from an explicit set of variables.
///
/// # Errors
///
/// See [`load`].
pub fn load_from(vars: impl IntoIterator<Item = (String, String)>) -> Result<ProvisionConfig> {
    let mut config: ProvisionConfig = envy::prefixed(ENV_PREFIX)
        .from_iter(vars)
        .with_context(|| format!("invalid {ENV_PREFIX}* configuration"))?;

    config
        .min_version()
        .with_context(|| format!("invalid {ENV_PREFIX}MIN_KUBECTL_VERSION"))?;

    config.working_dir = std::path::absolute(&config.working_dir).with_context(|| {
        format!(
            "cannot resolve working directory {}",
            config.working_dir.display()
        )
    })?;

    tracing::info!(
        working_dir = %config.working_dir.display(),
        terraform = %config.terraform.display(),
        kubectl = %config.kubectl,
        min_kubectl_version = %config.min_kubectl_version,
        "configuration loaded",
    );
    Ok(config)
}
