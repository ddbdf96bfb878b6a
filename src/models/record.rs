//! Per-archive package record

use std::collections::BTreeMap;

/// Map of CMake find_package names to the canonical package name taken from
/// a matching `<Name>Config.cmake` / `<name>-config.cmake` file
pub type ConfigMap = BTreeMap<String, String>;

/// Map of CMake find_package names to the targets declared under that
/// directory
///
/// Target lists keep every `add_library` hit, duplicates included. They are
/// sorted once the record is finalized, never deduplicated.
pub type TargetMap = BTreeMap<String, Vec<String>>;

/// CMake consumption metadata extracted from one package tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRecord {
    /// Port name (`Source` or `Package` field)
    pub port_name: String,
    /// Port description, already escaped
    pub port_description: String,
    /// Usage instructions, already escaped
    pub usage_text: String,
    /// Canonical names for find_package directories
    pub config_map: ConfigMap,
    /// Declared targets per find_package directory
    pub target_map: TargetMap,
}

impl PackageRecord {
    /// Create an empty record for a port
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            ..Self::default()
        }
    }

    /// Resolve the package name to report for a find_package directory.
    ///
    /// Falls back to the directory name itself when no config file matched.
    pub fn package_name<'a>(&'a self, find_package_name: &'a str) -> &'a str {
        self.config_map
            .get(find_package_name)
            .map(String::as_str)
            .unwrap_or(find_package_name)
    }

    /// Number of find_package names this port provides
    pub fn package_count(&self) -> usize {
        self.target_map.len()
    }

    /// Name of the placeholder entry emitted for ports without any package
    pub fn placeholder_name(&self) -> String {
        format!("_{}", self.port_name)
    }

    /// Append a target declared under a find_package directory
    pub fn add_target(&mut self, find_package_name: &str, target: impl Into<String>) {
        self.target_map
            .entry(find_package_name.to_string())
            .or_default()
            .push(target.into());
    }

    /// Sort every target list lexicographically
    pub fn sort_targets(&mut self) {
        for targets in self.target_map.values_mut() {
            targets.sort();
        }
    }
}
