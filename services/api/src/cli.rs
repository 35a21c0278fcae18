use crate::predict::{run_capabilities, run_predict, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use haryali_ml::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Haryali ML",
    about = "Serve and query the Haryali parali price predictor",
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
    /// Score a single price observation against the configured artifacts
    Predict(PredictArgs),
    /// Print which prediction paths the configured artifacts enable
    Capabilities,
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
        Command::Predict(args) => run_predict(args),
        Command::Capabilities => run_capabilities(),
    }
}
