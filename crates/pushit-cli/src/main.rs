use clap::Parser;
use pushit_cli::cli_args::Cli;
use pushit_cli::dispatch;
use pushit_core::logging::{LoggingOptions, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_logging(LoggingOptions::unattended().with_verbosity(cli.verbose)) {
        eprintln!("Warning: structured logging unavailable: {err}");
    }
    if let Err(err) = dispatch(cli).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
