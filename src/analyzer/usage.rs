//! Usage text for consuming a package

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::escape::escape;

/// Name of the file holding a port's consumption instructions
pub const USAGE_FILE: &str = "usage";

lazy_static! {
    static ref FIND_PACKAGE_RE: Regex = Regex::new(r"\bfind_package\(([^\s\)]+)\s").unwrap();
}

/// First file literally named `usage` in `files`
pub fn find_usage_file(files: &[PathBuf]) -> Option<&Path> {
    files
        .iter()
        .map(PathBuf::as_path)
        .find(|f| f.file_name().map_or(false, |n| n == USAGE_FILE))
}

/// Read and escape the first usage file among `files`.
///
/// An unreadable usage file is treated as absent.
pub fn read_usage(files: &[PathBuf]) -> Option<String> {
    let path = find_usage_file(files)?;

    match std::fs::read(path) {
        Ok(bytes) => {
            debug!("Using usage file {}", path.display());
            Some(escape(&String::from_utf8_lossy(&bytes)))
        }
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            None
        }
    }
}

/// Distinct find_package names mentioned in usage text, in first-seen order.
///
/// This is a guess taken from prose and example snippets. The names are not
/// checked against anything the package actually installs.
pub fn detect_find_packages(usage_text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for caps in FIND_PACKAGE_RE.captures_iter(usage_text) {
        if let Some(m) = caps.get(1) {
            if !names.iter().any(|n| n == m.as_str()) {
                names.push(m.as_str().to_string());
            }
        }
    }

    names
}

/// Generate usage text for a package from its sorted targets.
///
/// Names are escaped on the way in, so the result is report-ready.
pub fn synthesize_usage(port_name: &str, package_name: &str, targets: &[String]) -> String {
    let targets: Vec<String> = targets.iter().map(|t| escape(t)).collect();

    format!(
        "The package {} provides CMake targets:\\r\\n\\r\\n    \
         find_package({} CONFIG REQUIRED)\\r\\n    \
         target_link_libraries(main PRIVATE {})\\r\\n",
        escape(port_name),
        escape(package_name),
        targets.join(" ")
    )
}
