//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::application::services::preflight::check_usage;
use crate::commands;

/// Create an EKS kubernetes cluster on AWS
#[derive(Parser)]
#[command(
    name = "ekscluster",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an EKS kubernetes cluster on AWS
    #[command(long_about = "Create an EKS cluster on AWS.\n\n\
        Run from the installation folder holding the Terraform configuration \
        and the terraform binary. The following binaries need to be in your PATH:\n\n    \
        kubectl (>= 1.10.0)\n    aws-iam-authenticator\n\n\
        AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be exported.")]
    Create(commands::create::CreateArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            command,
        } = self;
        let flags = OutputFlags { no_color, quiet };
        match command {
            Command::Create(args) => {
                // Stray arguments halt before configuration touches the environment.
                check_usage(&args.args)?;
                let app = AppContext::new(&flags)?;
                commands::create::run(&args, &app).await
            }
        }
    }
}
