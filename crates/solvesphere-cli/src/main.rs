use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "solvesphere")]
#[command(about = "SolveSphere - structured problem solving backed by hosted reasoning models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the process module catalog
    Modules(commands::modules::ModulesArgs),
    /// Run one solve and print the structured result
    Solve(commands::solve::SolveArgs),
    /// Inspect or clear stored solve history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Manage the API credential
    Credential {
        #[command(subcommand)]
        action: commands::credential::CredentialAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Modules(args) => commands::modules::run(args),
        Commands::Solve(args) => commands::solve::run(args).await,
        Commands::History { action } => commands::history::run(action).await,
        Commands::Credential { action } => commands::credential::run(action).await,
    }
}
