use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use claimguard_cli::{
    AppConfig,
    commands::{self, EXIT_ERROR, Outcome, Requirement},
};
use claimguard_observability::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "claimguard")]
#[command(about = "Extract identities from claims principals and evaluate role policies")]
#[command(long_about = None)]
#[command(version)]
struct Args {
    /// Configuration file (JSON)
    #[arg(short, long, env = "CLAIMGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Claim mapping preset, overriding the config file (keycloak or saml)
    #[arg(short, long)]
    mapping: Option<String>,

    /// Human-readable logs instead of JSON
    #[arg(long)]
    text_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the identity extracted from a principal
    Inspect {
        /// Principal document (JSON)
        #[arg(short, long)]
        principal: PathBuf,
    },
    /// Check a principal against a named policy or an ad-hoc role list
    Check {
        /// Principal document (JSON)
        #[arg(short, long)]
        principal: PathBuf,

        /// Policy name from the configured table
        #[arg(long, conflicts_with = "role")]
        policy: Option<String>,

        /// Acceptable role (repeatable); any one suffices
        #[arg(long)]
        role: Vec<String>,
    },
    /// List the configured policies
    Policies,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.text_logs {
        claimguard_observability::init_with(LogFormat::Text);
    } else {
        claimguard_observability::init();
    }

    match run(args) {
        Ok(outcome) => {
            println!("{}", outcome.output);
            ExitCode::from(outcome.status)
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(args: Args) -> anyhow::Result<Outcome> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    config.override_mapping(args.mapping);
    let evaluator = config.evaluator()?;

    match args.command {
        Command::Inspect { principal } => {
            let principal = commands::read_principal(&principal)?;
            commands::inspect_outcome(&evaluator, &principal)
        }
        Command::Check {
            principal,
            policy,
            role,
        } => {
            let requirement = Requirement::from_args(policy, role)?;
            let principal = commands::read_principal(&principal)?;
            commands::check_outcome(&evaluator, &principal, &requirement)
        }
        Command::Policies => commands::policies_outcome(&evaluator),
    }
}
