use crate::commands::{run_assess, run_questions, AssessArgs, QuestionsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use nis2_scope::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "NIS2 Scope",
    about = "Check whether the Swedish Cybersecurity Act applies to an organization",
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
    /// Assess a JSON answer file and print the outcome
    Assess(AssessArgs),
    /// List the questions visible for a JSON answer file
    Questions(QuestionsArgs),
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
        Command::Assess(args) => run_assess(args),
        Command::Questions(args) => run_questions(args),
    }
}
