//! Report entry representation

/// One package entry of the aggregated report
///
/// String fields hold report-ready text: description and usage were escaped
/// when they were read from the package tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Resolved package name (also the report key)
    pub name: String,
    /// Sorted target names
    pub targets: Vec<String>,
    /// Port the package came from
    pub port_name: String,
    /// Port description
    pub port_description: String,
    /// Usage instructions
    pub usage: String,
}

