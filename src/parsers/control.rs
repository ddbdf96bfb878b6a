//! Port metadata reader
//!
//! Reads the `CONTROL` file at the root of an extracted package and pulls
//! out the port name and description from its first paragraph.

use std::path::Path;

use tracing::debug;

use super::paragraph::parse_paragraphs;
use crate::error::{CmakeScanError, Result};
use crate::escape::escape;

/// Name of the metadata file at the package root
pub const CONTROL_FILE: &str = "CONTROL";

/// Port metadata taken from the control file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlInfo {
    /// `Source` for a source description, else `Package`
    pub port_name: String,
    /// Escaped `Description`, empty when absent
    pub port_description: String,
}

/// Read the control file of an extracted package tree
pub fn read_control(package_root: &Path) -> Result<ControlInfo> {
    let control_path = package_root.join(CONTROL_FILE);

    if !control_path.is_file() {
        return Err(CmakeScanError::metadata(&control_path, "file does not exist"));
    }

    let content = std::fs::read_to_string(&control_path)
        .map_err(|e| CmakeScanError::metadata(&control_path, e.to_string()))?;
    let paragraphs = parse_paragraphs(&content)
        .map_err(|e| CmakeScanError::metadata(&control_path, e.to_string()))?;

    let first = paragraphs
        .first()
        .ok_or_else(|| CmakeScanError::metadata(&control_path, "no paragraphs found"))?;

    // Source CONTROL file, then binary CONTROL file
    let port_name = first
        .get("Source")
        .or_else(|| first.get("Package"))
        .ok_or_else(|| CmakeScanError::MissingField("Source".into()))?
        .clone();

    let port_description = first
        .get("Description")
        .map(|d| escape(d))
        .unwrap_or_default();

    debug!("Read port '{}' from {}", port_name, control_path.display());

    Ok(ControlInfo {
        port_name,
        port_description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_control(content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONTROL_FILE), content).unwrap();
        dir
    }

    #[test]
    fn test_source_control() {
        let dir =
            write_control("Source: fmt\nVersion: 7.1.3\nDescription: Formatting \"library\"\n");
        let info = read_control(dir.path()).unwrap();

        assert_eq!(info.port_name, "fmt");
        assert_eq!(info.port_description, "Formatting \\\"library\\\"");
    }

    #[test]
    fn test_binary_control() {
        let dir = write_control(concat!(
            "Package: zlib\nVersion: 1.2.11\nArchitecture: x64-windows\n",
            "Description: A compression library\n  with deflate\n",
        ));
        let info = read_control(dir.path()).unwrap();

        assert_eq!(info.port_name, "zlib");
        assert_eq!(info.port_description, "A compression library\\nwith deflate");
    }

    #[test]
    fn test_source_wins_over_package() {
        let dir = write_control("Source: boost-mpl\nPackage: boost-mpl-bin\n");
        assert_eq!(read_control(dir.path()).unwrap().port_name, "boost-mpl");
    }

    #[test]
    fn test_only_first_paragraph_is_used() {
        let dir = write_control("Source: curl\n\nFeature: ssl\nDescription: SSL support\n");
        let info = read_control(dir.path()).unwrap();

        assert_eq!(info.port_name, "curl");
        assert_eq!(info.port_description, "");
    }

    #[test]
    fn test_missing_control() {
        let dir = TempDir::new().unwrap();
        let err = read_control(dir.path()).unwrap_err();
        assert!(matches!(err, CmakeScanError::Metadata { .. }));
    }

    #[test]
    fn test_malformed_control() {
        let dir = write_control("Source fmt\n");
        let err = read_control(dir.path()).unwrap_err();
        assert!(matches!(err, CmakeScanError::Metadata { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_nameless_control() {
        let dir = write_control("Version: 1.0\n");
        let err = read_control(dir.path()).unwrap_err();
        assert!(matches!(err, CmakeScanError::MissingField(_)));
    }
}
