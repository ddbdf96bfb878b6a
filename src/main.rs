//! cmakescan - CMake usage information from packaged library trees
//!
//! Main entry point for the cmakescan CLI application.

use std::process::ExitCode;

use console::style;
use tracing_subscriber::EnvFilter;

use cmakescan::cli::{self, Cli, Commands};
use cmakescan::config::Config;
use cmakescan::error::Result;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Set up logging based on CLI arguments and configuration
fn setup_logging(cli: &Cli, config: &Config) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        config.logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // Progress goes to stderr so a report on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.logging.color)
        .with_target(false)
        .without_time()
        .init();
}

/// Main application logic
fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(ref path) => path.clone(),
        None => Config::config_path()?,
    };
    let config = Config::load_from(&config_path)?;

    setup_logging(&cli, &config);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Analyze(ref args) => cli::execute_analyze(args, &config, cli.quiet),
        Commands::Config(ref args) => cli::execute_config(args, &config_path),
        Commands::Clean(ref args) => cli::execute_clean(args, &config),
    }
}
