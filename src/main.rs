use clap::Parser;
use log::info;
use std::process::ExitCode;

use buddyctl::cli::Cli;
use buddyctl::output;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting buddyctl - Buddy pipeline deployments");

    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", output::bright_red("Error:"));
            ExitCode::FAILURE
        }
    }
}
