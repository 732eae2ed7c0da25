use crate::commands::{
    run_check_text, run_export, run_top_risk, CheckTextArgs, ExportArgs, TopRiskArgs,
};
use crate::server;
use churn_copilot::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Churn Copilot",
    about = "Rank churn risk, route retention outreach, and check messaging from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the highest-risk customers for the latest week
    TopRisk(TopRiskArgs),
    /// Write the ranked list to a CSV file
    Export(ExportArgs),
    /// Check outreach copy against the messaging guardrail
    CheckText(CheckTextArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::TopRisk(args) => run_top_risk(args),
        Command::Export(args) => run_export(args),
        Command::CheckText(args) => run_check_text(args),
    }
}
