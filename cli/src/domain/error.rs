//! Typed domain error enum.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! `ProvisionError` implements `thiserror::Error` and converts to
//! `anyhow::Error` via the `?` operator.

use thiserror::Error;

/// Every way a `create` run can stop before the final success message.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Invalid, there is no need to use arguments with this command\n\nSimple use : ekscluster create")]
    Usage,

    #[error("{0}")]
    MissingDependency(String),

    #[error(
        "kubectl client version on this system ({installed}) is less than the required version {required}"
    )]
    VersionIncompatible { installed: String, required: String },

    #[error(
        "There is an existing cluster, please remove {state_file} or delete the installation before proceeding"
    )]
    PreexistingInstallation { state_file: String },

    #[error("{0} not exported as environment variable, kindly check")]
    MissingCredential(&'static str),

    #[error("{step} failed: {detail}")]
    Subprocess { step: String, detail: String },

    #[error("cannot create {path}: {detail}")]
    FileIo { path: String, detail: String },
}

impl ProvisionError {
    /// Process exit code for this failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage => 2,
            Self::MissingDependency(_) => 3,
            Self::VersionIncompatible { .. } => 4,
            Self::PreexistingInstallation { .. } => 5,
            Self::MissingCredential(_) => 6,
            Self::Subprocess { .. } => 7,
            Self::FileIo { .. } => 8,
        }
    }
}
