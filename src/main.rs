use clap::{CommandFactory, Parser};
use geprotocol::cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Bare invocation prints help and succeeds
    if std::env::args_os().len() <= 1 {
        return match Cli::command().print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: Io: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let cli = Cli::parse();

    let result = geprotocol::load_config(&cli).and_then(|config| {
        geprotocol::logging::init(&config.logging, cli.verbose)?;
        tracing::debug!("Configuration: {:?}", config);
        geprotocol::run(&cli, &config, &mut std::io::stdout().lock())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}: {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}
