//! AWS credential presence checks.

use crate::domain::error::ProvisionError;

/// Access key variable read by Terraform's AWS provider.
pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
/// Secret key variable read by Terraform's AWS provider.
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";

/// Required variables, in the order they are checked.
pub const REQUIRED_CREDENTIAL_VARS: [&str; 2] = [ACCESS_KEY_ID_VAR, SECRET_ACCESS_KEY_VAR];

/// Check that every required credential variable is set and non-empty.
///
/// `lookup` returns the variable's value, `None` when unset. Values are never
/// inspected beyond emptiness; Terraform reads them from its environment.
///
/// # Errors
///
/// Returns `MissingCredential` naming the first missing variable.
pub fn check_credentials(lookup: impl Fn(&str) -> Option<String>) -> Result<(), ProvisionError> {
    for name in REQUIRED_CREDENTIAL_VARS {
        match lookup(name) {
            Some(value) if !value.is_empty() => {}
            _ => return Err(ProvisionError::MissingCredential(name)),
        }
    }
    Ok(())
}
