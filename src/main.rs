//! sketchyrelay: forward macOS lifecycle notifications to the sketchybar helper.

use clap::{ArgAction, Parser};
use sketchyrelay::{Config, Relay};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "sketchyrelay", version, about)]
struct Cli {
    /// Print the resolved helper socket path and exit.
    #[arg(long)]
    print_socket: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.print_socket {
        println!("{}", config.socket);
        return ExitCode::SUCCESS;
    }

    let result = Relay::new(config).and_then(|relay| relay.run());
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
