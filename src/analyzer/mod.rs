//! Package analysis: builds one [`PackageRecord`] from an extracted tree

pub mod cmake;
pub mod usage;

use std::path::Path;

use tracing::debug;

use crate::error::{CmakeScanError, Result};
use crate::models::PackageRecord;
use crate::parsers::read_control;

/// Builds the CMake consumption record of an extracted package tree
pub struct PackageAnalyzer<'a> {
    /// Root of the extracted package
    package_root: &'a Path,
}

impl<'a> PackageAnalyzer<'a> {
    /// Create a new analyzer
    pub fn new(package_root: &'a Path) -> Result<Self> {
        if !package_root.is_dir() {
            return Err(CmakeScanError::file_not_found(package_root));
        }

        Ok(Self { package_root })
    }

    /// Read the tree and produce its finalized record
    pub fn analyze(&self) -> Result<PackageRecord> {
        let control = read_control(self.package_root)?;

        let mut record = PackageRecord::new(control.port_name);
        record.port_description = control.port_description;

        let files = cmake::collect_share_files(self.package_root)?;

        // Check and use the usage file, if one exists
        if let Some(usage) = usage::read_usage(&files) {
            record.usage_text = usage;
        }

        cmake::scan_cmake_files(&files, &mut record);

        // A port that only ships a usage file may still name its packages
        if record.target_map.is_empty() {
            for name in usage::detect_find_packages(&record.usage_text) {
                debug!("Inferred package {} from usage text", name);
                record.target_map.entry(name).or_default();
            }
        }

        finalize(&mut record);

        Ok(record)
    }
}

/// Sort target lists and synthesize usage text when none was shipped.
///
/// Usage is generated once, from the first package entry, and shared by
/// every entry of the record.
fn finalize(record: &mut PackageRecord) {
    record.sort_targets();

    if !record.usage_text.is_empty() {
        return;
    }

    if let Some((find_package_name, targets)) = record.target_map.iter().next() {
        let package_name = record.package_name(find_package_name);
        record.usage_text = usage::synthesize_usage(&record.port_name, package_name, targets);
    }
}
