use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use secure_env::cli::{self, TerminalPrompt};
use secure_env::config::{FileConfig, DEFAULT_SECRETS_FILE};
use secure_env::Result;

/// Overrides the log filter, e.g. `SECURE_ENV_LOG=debug`
const LOG_ENV: &str = "SECURE_ENV_LOG";

#[derive(Parser)]
#[command(name = "secure-env")]
#[command(author = "Oleg")]
#[command(version = "0.1.0")]
#[command(about = "Encrypt and decrypt a project's secrets file with a password", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt the secrets file into <PATH>.enc
    Encrypt {
        /// Plaintext file to protect
        #[arg(default_value = DEFAULT_SECRETS_FILE)]
        path: PathBuf,
    },

    /// Restore the secrets file from <PATH>.enc
    Decrypt {
        /// Plaintext file to restore
        #[arg(default_value = DEFAULT_SECRETS_FILE)]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the status lines
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut prompt = TerminalPrompt;
    match cli.command {
        Commands::Encrypt { path } => cli::encrypt::run(&FileConfig::new(path), &mut prompt)?,
        Commands::Decrypt { path } => cli::decrypt::run(&FileConfig::new(path), &mut prompt)?,
    };
    Ok(())
}
