use crate::commands::{run_rank, run_validate, RankArgs, ValidateArgs};
use crate::server::{self, Surface};
use clap::{Args, Parser, Subcommand};
use fama_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "fama-intake",
    about = "Serve the broker questionnaire and event forms, or rank and validate their data offline",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the broker questionnaire API (default command)
    Serve(ServeArgs),
    /// Start the event registration API
    ServeEvents(ServeArgs),
    /// Rank a CSV export of questionnaire submissions and print the result as JSON
    Rank(RankArgs),
    /// Validate a JSON submission against one of the forms
    Validate(ValidateArgs),
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
        Command::Serve(args) => server::run(Surface::Questionnaire, args).await,
        Command::ServeEvents(args) => server::run(Surface::Events, args).await,
        Command::Rank(args) => run_rank(args),
        Command::Validate(args) => run_validate(args),
    }
}
