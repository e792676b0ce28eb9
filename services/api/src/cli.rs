use crate::commands::{run_evaluate, run_list, run_show, EvaluateArgs, ShowArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use footprint_survey::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Footprint Survey",
    about = "Serve and evaluate footprint survey calculators from the command line",
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
    /// Inspect the registered calculators
    Calculators {
        #[command(subcommand)]
        command: CalculatorsCommand,
    },
    /// Score a JSON answer file against a calculator
    Evaluate(EvaluateArgs),
}

#[derive(Subcommand, Debug)]
enum CalculatorsCommand {
    /// List calculators in registration order
    List,
    /// Print a calculator definition as JSON
    Show(ShowArgs),
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
        Command::Calculators {
            command: CalculatorsCommand::List,
        } => run_list(),
        Command::Calculators {
            command: CalculatorsCommand::Show(args),
        } => run_show(args),
        Command::Evaluate(args) => run_evaluate(args),
    }
}
