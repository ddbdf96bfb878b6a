//! Pipeline driver: extraction, record building and report emission
//!
//! Archives are independent. Each one is extracted into its own directory
//! under a shared per-run root, analyzed into a record, and the records are
//! aggregated in input order. A failing archive is logged and skipped unless
//! the run is strict.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tempfile::TempDir;
use tracing::{debug, error, info, warn};

use crate::analyzer::PackageAnalyzer;
use crate::archive;
use crate::config::Config;
use crate::error::{CmakeScanError, Result};
use crate::models::PackageRecord;
use crate::report::Report;

/// Prefix of the per-run extraction root directory
pub const TEMP_PREFIX: &str = "cmakescan-";

/// Run configuration passed through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Suppress progress messages
    pub quiet: bool,
    /// Number of archives processed in parallel
    pub jobs: usize,
    /// Keep the extraction root after the run
    pub keep_temp: bool,
    /// Abort on the first archive that fails
    pub strict: bool,
    /// Directory under which the extraction root is created
    pub temp_base: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            quiet: false,
            jobs: 1,
            keep_temp: false,
            strict: false,
            temp_base: std::env::temp_dir(),
        }
    }
}

impl RunOptions {
    /// Derive run options from the persistent configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            quiet: false,
            jobs: config.general.jobs.max(1),
            keep_temp: config.extraction.keep_temp,
            strict: config.general.strict,
            temp_base: config.temp_root(),
        }
    }
}

/// An archive that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFailure {
    /// Input path
    pub path: PathBuf,
    /// Error message
    pub message: String,
}

/// Result of analyzing a set of inputs
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Aggregated report
    pub report: Report,
    /// Records that made it into the report, in input order
    pub records: Vec<PackageRecord>,
    /// Archives that were skipped
    pub failures: Vec<ArchiveFailure>,
}

/// Read a list of input paths, one per line.
///
/// Lines are trimmed and blank lines dropped.
pub fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CmakeScanError::Other(format!(
            "Failed opening input file '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Analyze every input and write the report to `output` (stdout when `None`)
pub fn run(inputs: &[PathBuf], output: Option<&Path>, options: &RunOptions) -> Result<RunOutcome> {
    // Open the destination first so a bad path fails before any work
    let sink = match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| CmakeScanError::output(path, e))?;
            if !options.quiet {
                info!("Output will be written to '{}'.", path.display());
            }
            Some((path, file))
        }
        None => None,
    };

    let outcome = analyze_inputs(inputs, options)?;

    match sink {
        Some((path, file)) => outcome
            .report
            .write_to(BufWriter::new(file))
            .map_err(|e| CmakeScanError::output(path, e))?,
        None => outcome
            .report
            .write_to(std::io::stdout().lock())
            .map_err(|e| CmakeScanError::output("<stdout>", e))?,
    }

    Ok(outcome)
}

/// Analyze every input into records and aggregate them
pub fn analyze_inputs(inputs: &[PathBuf], options: &RunOptions) -> Result<RunOutcome> {
    let mut root = ExtractionRoot::create(&options.temp_base)?;

    let work: Vec<(&PathBuf, Option<PathBuf>)> = inputs
        .iter()
        .map(|input| {
            let dest = if input.is_dir() {
                None
            } else {
                Some(root.slot(input))
            };
            (input, dest)
        })
        .collect();

    let results = if options.jobs > 1 && work.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.jobs)
            .build()
            .map_err(|e| CmakeScanError::Other(e.to_string()))?;

        pool.install(|| {
            work.par_iter()
                .map(|(input, dest)| process_input(input, dest.as_deref(), options))
                .collect::<Vec<_>>()
        })
    } else {
        let mut results = Vec::with_capacity(work.len());
        for (input, dest) in &work {
            let result = process_input(input, dest.as_deref(), options);
            let failed = result.is_err();
            results.push(result);
            if failed && options.strict {
                break;
            }
        }
        results
    };

    let mut outcome = RunOutcome::default();
    for ((input, _), result) in work.iter().zip(results) {
        match result {
            Ok(record) => outcome.records.push(record),
            Err(e) => {
                error!("failed: {}: {}", input.display(), e);
                if options.strict {
                    root.finish(options.keep_temp)?;
                    return Err(e);
                }
                outcome.failures.push(ArchiveFailure {
                    path: input.to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }

    outcome.report = Report::from_records(&outcome.records);
    for name in outcome.report.duplicate_names() {
        warn!("Package name '{}' is reported by more than one archive", name);
    }

    root.finish(options.keep_temp)?;

    Ok(outcome)
}

/// Extract (when needed) and analyze one input
fn process_input(input: &Path, dest: Option<&Path>, options: &RunOptions) -> Result<PackageRecord> {
    if !options.quiet {
        info!("Processing {}...", input.display());
    }

    let package_root = match dest {
        Some(dest) => {
            archive::extract(input, dest)?;
            dest
        }
        None => input,
    };

    let record = PackageAnalyzer::new(package_root)?.analyze()?;

    if !options.quiet {
        let count = record.package_count();
        info!(
            "done (port '{}' provides {} package{})",
            record.port_name,
            count,
            if count == 1 { "" } else { "s" }
        );
    }

    Ok(record)
}

/// Extraction roots left behind under `base` by earlier runs
pub fn stale_extraction_roots(base: &Path) -> Result<Vec<PathBuf>> {
    let mut roots = Vec::new();
    if !base.is_dir() {
        return Ok(roots);
    }

    for entry in std::fs::read_dir(base)? {
        let entry = entry?;
        let is_root = entry.file_name().to_string_lossy().starts_with(TEMP_PREFIX);
        if is_root && entry.file_type()?.is_dir() {
            roots.push(entry.path());
        }
    }

    roots.sort();
    Ok(roots)
}

/// Shared temporary directory holding one extraction directory per archive
struct ExtractionRoot {
    dir: TempDir,
    used: HashSet<String>,
}

impl ExtractionRoot {
    fn create(base: &Path) -> Result<Self> {
        std::fs::create_dir_all(base).map_err(|e| {
            CmakeScanError::TempDir(format!("Failed creating {}: {}", base.display(), e))
        })?;

        let dir = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir_in(base)
            .map_err(|e| {
                CmakeScanError::TempDir(format!(
                    "Failed creating temp directory in {}: {}",
                    base.display(),
                    e
                ))
            })?;

        debug!("Extracting packages under {}", dir.path().display());

        Ok(Self {
            dir,
            used: HashSet::new(),
        })
    }

    /// Reserve an extraction directory named after the archive's base name.
    ///
    /// Repeated base names get a `-2`, `-3`, ... suffix.
    fn slot(&mut self, input: &Path) -> PathBuf {
        let base = archive::base_name(input);
        let mut name = base.clone();
        let mut n = 1;
        while !self.used.insert(name.clone()) {
            n += 1;
            name = format!("{}-{}", base, n);
        }
        self.dir.path().join(name)
    }

    fn finish(self, keep: bool) -> Result<()> {
        if keep {
            let path = self.dir.into_path();
            info!("Kept extracted packages in {}", path.display());
            Ok(())
        } else {
            let path = self.dir.path().to_path_buf();
            self.dir.close().map_err(|e| {
                CmakeScanError::TempDir(format!("Failed removing {}: {}", path.display(), e))
            })
        }
    }
}
