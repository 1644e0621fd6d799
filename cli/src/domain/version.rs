//! kubectl client version parsing and gating.
//!
//! Pure functions only, no I/O.

use anyhow::{Context, Result};
use semver::Version;

/// Oldest kubectl client that can talk to EKS with the IAM authenticator.
pub const MIN_KUBECTL_VERSION: Version = Version::new(1, 10, 0);

/// Extract the client version from `kubectl version --client --short` output.
///
/// Accepts `Client Version: v1.9.5` as well as the multi-line output of newer
/// clients, where the client line is followed by e.g. `Kustomize Version:`.
///
/// # Errors
///
/// Returns an error if no version token is present or it is not semver.
pub fn parse_client_version(output: &str) -> Result<Version> {
    let line = output
        .lines()
        .find(|l| l.trim_start().starts_with("Client Version:"))
        .or_else(|| output.lines().find(|l| !l.trim().is_empty()))
        .with_context(|| "kubectl printed no version output".to_string())?;

    let token = match line.split_once("Version:") {
        Some((_, rest)) => rest.split_whitespace().next(),
        None => line.split_whitespace().nth(2),
    }
    .with_context(|| format!("no version token in kubectl output: {}", line.trim()))?;

    let bare = token.trim().trim_start_matches('v');
    Version::parse(bare).with_context(|| format!("cannot parse kubectl version '{token}'"))
}

/// `true` when `installed` is at least `minimum` by major.minor.patch.
///
/// Pre-release and build metadata are ignored: distribution builds such as
/// `1.10.3-eks-2f3c9b` count as `1.10.3`.
#[must_use]
pub fn meets_minimum(installed: &Version, minimum: &Version) -> bool {
    let core = |v: &Version| (v.major, v.minor, v.patch);
    core(installed) >= core(minimum)
}
