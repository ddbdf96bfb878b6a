//! CMake package-config scanner
//!
//! Targets are found by matching `add_library(<name> ` in the text of every
//! `.cmake` file under `share/`. This is a textual heuristic: targets created
//! through macros, generator expressions or conditionals are not seen, and a
//! declaration without whitespace after the name (`add_library(foo)`) is
//! missed. No CMake code is evaluated.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::PackageRecord;

/// Name of the shared-data directory holding package config files
pub const SHARE_DIR: &str = "share";

lazy_static! {
    static ref ADD_LIBRARY_RE: Regex = Regex::new(r"\badd_library\(([^\s\)]+)\s").unwrap();
}

/// Recursively list every file under `<package_root>/share`, sorted by path.
///
/// A package without a `share` directory yields an empty list.
pub fn collect_share_files(package_root: &Path) -> Result<Vec<PathBuf>> {
    let share_dir = package_root.join(SHARE_DIR);
    if !share_dir.is_dir() {
        debug!("No {} directory in {}", SHARE_DIR, package_root.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(&share_dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Whether a path is a `.cmake` file located under a `share` directory
pub fn is_share_cmake_file(path: &Path) -> bool {
    let is_cmake = path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.ends_with(".cmake"));

    let under_share = path.parent().map_or(false, |parent| {
        parent
            .components()
            .any(|c| c.as_os_str().to_string_lossy().eq_ignore_ascii_case(SHARE_DIR))
    });

    is_cmake && under_share
}

/// The find_package name for a config file: its immediate parent directory
pub fn find_package_name(path: &Path) -> Option<String> {
    path.parent()?
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
}

/// Target names declared with `add_library` in CMake source text, in order
pub fn declared_targets(content: &str) -> impl Iterator<Item = &str> {
    ADD_LIBRARY_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// The package root named by a config file, if it matches the find_package
/// name.
///
/// `<Root>Config.cmake` and `<root>-config.cmake` qualify when `Root`
/// equals the find_package name ignoring ASCII case. The root keeps the
/// casing of the file name.
pub fn config_root<'a>(file_name: &'a str, find_package_name: &str) -> Option<&'a str> {
    let root = file_name
        .strip_suffix("Config.cmake")
        .or_else(|| file_name.strip_suffix("-config.cmake"))?;

    if root.eq_ignore_ascii_case(find_package_name) {
        Some(root)
    } else {
        None
    }
}

/// Scan the `.cmake` files among `files` into the record's target and config
/// maps
pub fn scan_cmake_files(files: &[PathBuf], record: &mut PackageRecord) {
    for path in files.iter().filter(|p| is_share_cmake_file(p)) {
        let Some(package_name) = find_package_name(path) else {
            continue;
        };

        match std::fs::read(path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                for target in declared_targets(&content) {
                    debug!("Found target {} in {}", target, path.display());
                    record.add_target(&package_name, target);
                }
            }
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
            }
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if let Some(root) = config_root(&file_name, &package_name) {
            record
                .config_map
                .insert(package_name.clone(), root.to_string());
        }
    }
}
