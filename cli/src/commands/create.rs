//! `ekscluster create`: provision an EKS cluster with Terraform and register
//! its worker nodes.

use anyhow::Result;
use clap::Args;
use tracing::Instrument as _;

use crate::app::AppContext;
use crate::application::services::provision::{self as service, ClusterCreated};
use crate::output::OutputContext;

/// Arguments for the create command.
#[derive(Args, Default)]
pub struct CreateArgs {
    /// Not accepted; present so stray arguments, flag-shaped ones included,
    /// get the usage guidance instead of a generic parser error.
    #[arg(hide = true, allow_hyphen_values = true, trailing_var_arg = true)]
    pub args: Vec<String>,
}

/// Run `ekscluster create`.
///
/// # Errors
///
/// Returns the first usage, preflight, or provisioning failure.
pub async fn run(args: &CreateArgs, app: &AppContext) -> Result<()> {
    let reporter = app.terminal_reporter();

    let created =
        service::create_cluster(&args.args, &app.config, &app.host, &app.runner, &reporter)
            .instrument(tracing::info_span!("cmd.create"))
            .await?;

    print_summary(&created, &app.output);
    Ok(())
}

fn print_summary(created: &ClusterCreated, ctx: &OutputContext) {
    if ctx.quiet {
        return;
    }
    println!();
    ctx.header("Cluster created");
    ctx.success(&format!(
        "kubectl {} at {}",
        created.preflight.kubectl_version,
        created.preflight.kubectl_path.display()
    ));
    ctx.success(&format!(
        "aws-iam-authenticator at {}",
        created.preflight.authenticator_path.display()
    ));
    ctx.success(&format!("kubeconfig: {}", created.kubeconfig.display()));
    ctx.success(&format!("config-map: {}", created.config_map.display()));
}
