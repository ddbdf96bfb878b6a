//! Command-line interface for cmakescan

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cmakescan - CMake usage information from packaged library trees
///
/// Reads one or more package archives and reports, for every package they
/// install, the find_package name, the exported targets and usage text.
#[derive(Parser, Debug)]
#[command(name = "cmakescan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress status messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CMAKESCAN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze packages and output their CMake usage information
    Analyze(AnalyzeArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Remove extraction directories kept by earlier runs
    Clean(CleanArgs),
}

/// Arguments for the analyze command
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Package archives or extracted package directories
    #[arg(conflicts_with = "infile")]
    pub input: Vec<PathBuf>,

    /// Read packages from file instead of command line (one package per line)
    #[arg(long)]
    pub infile: Option<PathBuf>,

    /// Output to file instead of stdout
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,

    /// Number of archives processed in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Keep extracted packages after the run
    #[arg(long)]
    pub keep_temp: bool,

    /// Abort on the first package that fails
    #[arg(long)]
    pub strict: bool,

    /// Directory in which packages are extracted
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for the clean command
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Dry run - show what would be deleted
    #[arg(short, long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "cmakescan", "analyze", "--quiet", "--outfile", "out.json", "a.zip", "b.zip",
        ])
        .unwrap();

        assert!(cli.quiet);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.input, vec![PathBuf::from("a.zip"), PathBuf::from("b.zip")]);
                assert_eq!(args.outfile, Some(PathBuf::from("out.json")));
                assert!(args.infile.is_none());
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_infile_conflicts_with_inputs() {
        let result = Cli::try_parse_from(["cmakescan", "analyze", "--infile", "list.txt", "a.zip"]);
        assert!(result.is_err());
    }
}
