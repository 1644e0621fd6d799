//! ekscluster - provision an EKS cluster from the installation folder

use clap::Parser;

use ekscluster_cli::cli::Cli;
use ekscluster_cli::domain::ProvisionError;

/// Exit code for failures outside the provisioning taxonomy (e.g. bad config).
const EXIT_OTHER: i32 = 1;

#[tokio::main]
async fn main() {
    ekscluster_cli::logging::init();
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ProvisionError>())
        .map_or(EXIT_OTHER, |e| {
            tracing::debug!(error = ?e, code = e.exit_code(), "classified error");
            e.exit_code()
        })
}
