//! cmakescan - CMake usage information from packaged library trees
//!
//! cmakescan reads package archives holding an installed library tree and
//! works out how a downstream CMake project should consume each package:
//! the `find_package` name, the targets it exports, and usage text.
//!
//! # Features
//!
//! - **Textual**: targets and names are inferred from file names and
//!   `add_library` declarations, CMake is never run
//! - **Deterministic**: sorted traversal and sorted target lists
//! - **Forgiving**: a broken package is logged and skipped
//! - **Parallel**: optional per-archive parallelism with stable output order
//!
//! # Quick Start
//!
//! ```bash
//! # Analyze packages and print the report
//! cmakescan analyze fmt_x64-linux.zip zlib_x64-linux.zip
//!
//! # Read the package list from a file and write the report to disk
//! cmakescan analyze --quiet --infile packages.txt --outfile usage.json
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analyzer;
pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod escape;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod report;

// Re-export commonly used types
pub use error::{CmakeScanError, Result};
pub use models::{ConfigMap, PackageRecord, ReportEntry, TargetMap};
pub use pipeline::RunOptions;
pub use report::Report;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Analyze a single extracted package directory
///
/// # Arguments
///
/// * `package_root` - Root of the extracted package tree (holding `CONTROL`)
///
/// # Returns
///
/// The finalized package record on success
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// let record = cmakescan::analyze(Path::new("./packages/fmt_x64-linux")).unwrap();
/// println!("{} provides {} package(s)", record.port_name, record.package_count());
/// ```
pub fn analyze(package_root: &std::path::Path) -> Result<PackageRecord> {
    analyzer::PackageAnalyzer::new(package_root)?.analyze()
}

/// Analyze archives or package directories into an aggregated report
///
/// Failing inputs are skipped unless `options.strict` is set.
pub fn analyze_all(inputs: &[std::path::PathBuf], options: &RunOptions) -> Result<Report> {
    Ok(pipeline::analyze_inputs(inputs, options)?.report)
}
