//! Command execution handlers

use std::path::Path;

use console::style;
use dialoguer::Confirm;
use tracing::info;

use crate::config::Config;
use crate::error::{CmakeScanError, Result};
use crate::pipeline::{self, RunOptions};

/// Execute the analyze command
pub fn execute_analyze(args: &super::AnalyzeArgs, config: &Config, quiet: bool) -> Result<()> {
    let mut options = RunOptions::from_config(config);
    options.quiet = quiet;
    options.keep_temp |= args.keep_temp;
    options.strict |= args.strict;
    if let Some(jobs) = args.jobs {
        options.jobs = jobs.max(1);
    }
    if let Some(ref temp_dir) = args.temp_dir {
        options.temp_base = temp_dir.clone();
    }

    let inputs = match args.infile {
        Some(ref infile) => {
            if !quiet {
                info!("Input will be read from '{}'.", infile.display());
            }
            pipeline::read_input_list(infile)?
        }
        None => args.input.clone(),
    };

    let outcome = pipeline::run(&inputs, args.outfile.as_deref(), &options)?;

    if !quiet {
        let summary = format!(
            "Analyzed {} of {} package archive(s), {} report entr{}",
            outcome.records.len(),
            inputs.len(),
            outcome.report.len(),
            if outcome.report.len() == 1 { "y" } else { "ies" }
        );
        if outcome.failures.is_empty() {
            eprintln!("{}", style(summary).green());
        } else {
            eprintln!(
                "{} ({} skipped)",
                style(summary).yellow(),
                outcome.failures.len()
            );
        }
    }

    Ok(())
}

/// Execute the config command
pub fn execute_config(args: &super::ConfigArgs, config_path: &Path) -> Result<()> {
    match &args.command {
        super::ConfigCommands::Show => {
            let config = Config::load_from(config_path)?;
            println!(
                "{}",
                toml::to_string_pretty(&config).map_err(|e| CmakeScanError::Other(e.to_string()))?
            );
        }
        super::ConfigCommands::Reset { yes } => {
            if *yes || confirm(&format!("Reset {} to defaults?", config_path.display()))? {
                Config::reset(config_path)?;
                println!("Configuration reset to defaults");
            }
        }
        super::ConfigCommands::Set { key, value } => {
            let mut config = Config::load_from(config_path)?;
            config.set(key, value)?;
            config.save_to(config_path)?;
            println!("Set {} = {}", key, value);
        }
        super::ConfigCommands::Get { key } => {
            let config = Config::load_from(config_path)?;
            if let Some(value) = config.get(key) {
                println!("{}", value);
            } else {
                println!("Key '{}' not found", key);
            }
        }
        super::ConfigCommands::Init { force } => {
            Config::init(config_path, *force)?;
            println!("Configuration initialized at {}", config_path.display());
        }
    }

    Ok(())
}

/// Execute the clean command
pub fn execute_clean(args: &super::CleanArgs, config: &Config) -> Result<()> {
    let roots = pipeline::stale_extraction_roots(&config.temp_root())?;

    if roots.is_empty() {
        println!("Nothing to clean");
        return Ok(());
    }

    if args.dry_run {
        for root in &roots {
            println!("Would remove: {}", root.display());
        }
        return Ok(());
    }

    let prompt = format!(
        "Remove {} extraction director{}?",
        roots.len(),
        if roots.len() == 1 { "y" } else { "ies" }
    );
    if !args.yes && !confirm(&prompt)? {
        return Ok(());
    }

    for root in &roots {
        std::fs::remove_dir_all(root)?;
    }
    println!("Cleaned {} directories", roots.len());

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CmakeScanError::Other(e.to_string()))
}
