//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod credentials;
pub mod error;
pub mod step;
pub mod version;

pub use config::ProvisionConfig;
pub use credentials::{REQUIRED_CREDENTIAL_VARS, check_credentials};
pub use error::ProvisionError;
pub use step::{Invocation, OutputPolicy, ProvisioningStep, StepKind, provisioning_plan};
pub use version::{MIN_KUBECTL_VERSION, meets_minimum, parse_client_version};
