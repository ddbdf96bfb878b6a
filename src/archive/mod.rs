//! Package archive extraction
//!
//! Packages arrive as zip files or (optionally compressed) tarballs holding
//! an installed library tree:
//! - CONTROL: port metadata
//! - share/<name>/*.cmake: CMake package config files
//! - share/<port>/usage: optional consumption instructions

use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::{debug, warn};
use xz2::read::XzDecoder;
use zip::result::ZipResult;
use zip::ZipArchive;

use crate::error::{CmakeScanError, Result};

/// Supported archive formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Zip archive (.zip)
    Zip,
    /// Uncompressed tarball (.tar)
    Tar,
    /// Gzip tarball (.tar.gz, .tgz)
    TarGz,
    /// XZ tarball (.tar.xz, .txz)
    TarXz,
    /// Zstandard tarball (.tar.zst, .tzst)
    TarZst,
    /// Bzip2 tarball (.tar.bz2, .tbz2)
    TarBz2,
}

impl ArchiveFormat {
    /// File name suffixes recognised for this format, longest first
    pub fn suffixes(&self) -> &'static [&'static str] {
        match self {
            Self::Zip => &[".zip"],
            Self::Tar => &[".tar"],
            Self::TarGz => &[".tar.gz", ".tgz"],
            Self::TarXz => &[".tar.xz", ".txz"],
            Self::TarZst => &[".tar.zst", ".tzst"],
            Self::TarBz2 => &[".tar.bz2", ".tbz2"],
        }
    }

    const ALL: [ArchiveFormat; 6] = [
        Self::TarGz,
        Self::TarXz,
        Self::TarZst,
        Self::TarBz2,
        Self::Tar,
        Self::Zip,
    ];

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.suffixes().iter().any(|s| name.ends_with(s)))
    }
}

/// Base name of an archive: its file name without the archive suffix.
///
/// Unknown suffixes fall back to the file stem.
pub fn base_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if let Some(format) = ArchiveFormat::from_path(path) {
        let lower = file_name.to_lowercase();
        for suffix in format.suffixes() {
            if lower.ends_with(suffix) {
                return file_name[..file_name.len() - suffix.len()].to_string();
            }
        }
    }

    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or(file_name)
}

/// Extract an archive into a destination directory
pub fn extract(archive_path: &Path, dest: &Path) -> Result<()> {
    if !archive_path.is_file() {
        return Err(CmakeScanError::file_not_found(archive_path));
    }

    let format = ArchiveFormat::from_path(archive_path).ok_or_else(|| {
        CmakeScanError::UnsupportedFormat(archive_path.display().to_string())
    })?;

    std::fs::create_dir_all(dest)?;
    debug!(
        "Extracting {} ({:?}) to {}",
        archive_path.display(),
        format,
        dest.display()
    );

    let reader = BufReader::new(File::open(archive_path)?);

    let result = match format {
        ArchiveFormat::Zip => extract_zip(reader, archive_path, dest).map_err(|e| e.to_string()),
        _ => extract_tar(reader, format, dest).map_err(|e| e.to_string()),
    };

    result.map_err(|e| CmakeScanError::extract(format!("{}: {}", archive_path.display(), e)))
}

/// Extract a zip archive entry by entry.
///
/// Entries whose names would land outside `dest` are skipped.
fn extract_zip<R: Read + Seek>(reader: R, archive_path: &Path, dest: &Path) -> ZipResult<()> {
    let mut archive = ZipArchive::new(reader)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let relative = match entry.enclosed_name() {
            Some(name) => name.to_path_buf(),
            None => {
                warn!(
                    "Skipping unsafe entry '{}' in {}",
                    entry.name(),
                    archive_path.display()
                );
                continue;
            }
        };

        let out_path = dest.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)?;
        std::io::copy(&mut entry, &mut out)?;
    }

    Ok(())
}

/// Extract a tar archive with the given compression
fn extract_tar<R: Read>(reader: R, format: ArchiveFormat, dest: &Path) -> std::io::Result<()> {
    match format {
        ArchiveFormat::TarGz => Archive::new(GzDecoder::new(reader)).unpack(dest),
        ArchiveFormat::TarXz => Archive::new(XzDecoder::new(reader)).unpack(dest),
        ArchiveFormat::TarZst => Archive::new(zstd::Decoder::new(reader)?).unpack(dest),
        ArchiveFormat::TarBz2 => {
            Archive::new(bzip2::read::BzDecoder::new(reader)).unpack(dest)
        }
        _ => Archive::new(reader).unpack(dest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const CONTROL: &[u8] = b"Source: fmt\n";

    fn format_of(name: &str) -> Option<ArchiveFormat> {
        ArchiveFormat::from_path(Path::new(name))
    }

    /// Uncompressed tar holding a single CONTROL file
    fn control_tar() -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_size(CONTROL.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, "CONTROL", CONTROL).unwrap();
        builder.into_inner().unwrap()
    }

    fn assert_extracts_control(temp: &TempDir, file_name: &str, bytes: &[u8]) {
        let archive_path = temp.path().join(file_name);
        std::fs::write(&archive_path, bytes).unwrap();

        let dest = temp.path().join(format!("{}-out", file_name));
        extract(&archive_path, &dest).unwrap();
        assert_eq!(std::fs::read(dest.join("CONTROL")).unwrap(), CONTROL);
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(format_of("fmt_x64-linux.zip"), Some(ArchiveFormat::Zip));
        assert_eq!(format_of("fmt.tar.gz"), Some(ArchiveFormat::TarGz));
        assert_eq!(format_of("fmt.TGZ"), Some(ArchiveFormat::TarGz));
        assert_eq!(format_of("fmt.tar.zst"), Some(ArchiveFormat::TarZst));
        assert_eq!(format_of("fmt.tar.bz2"), Some(ArchiveFormat::TarBz2));
        assert_eq!(format_of("fmt.tar"), Some(ArchiveFormat::Tar));
        assert_eq!(format_of("fmt.7z"), None);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("/pkgs/fmt_x64-linux.zip")), "fmt_x64-linux");
        assert_eq!(base_name(Path::new("zlib-1.2.11.tar.xz")), "zlib-1.2.11");
        assert_eq!(base_name(&PathBuf::from("odd.bin")), "odd");
    }

    #[test]
    fn test_extract_tar() {
        let temp = TempDir::new().unwrap();
        assert_extracts_control(&temp, "pkg.tar", &control_tar());
    }

    #[test]
    fn test_extract_tar_gz() {
        let temp = TempDir::new().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&control_tar()).unwrap();
        assert_extracts_control(&temp, "pkg.tar.gz", &encoder.finish().unwrap());
    }

    #[test]
    fn test_extract_tar_xz() {
        let temp = TempDir::new().unwrap();
        let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
        encoder.write_all(&control_tar()).unwrap();
        assert_extracts_control(&temp, "pkg.tar.xz", &encoder.finish().unwrap());
    }

    #[test]
    fn test_extract_tar_zst() {
        let temp = TempDir::new().unwrap();
        let mut encoder = zstd::Encoder::new(Vec::new(), 0).unwrap();
        encoder.write_all(&control_tar()).unwrap();
        assert_extracts_control(&temp, "pkg.tar.zst", &encoder.finish().unwrap());
    }

    #[test]
    fn test_extract_tar_bz2() {
        let temp = TempDir::new().unwrap();
        let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        encoder.write_all(&control_tar()).unwrap();
        assert_extracts_control(&temp, "pkg.tar.bz2", &encoder.finish().unwrap());
    }

    #[test]
    fn test_extract_zip() {
        let temp = TempDir::new().unwrap();
        let archive_path = temp.path().join("pkg.zip");

        let mut writer = zip::ZipWriter::new(File::create(&archive_path).unwrap());
        let options = zip::write::FileOptions::default();
        writer.add_directory("include/", options).unwrap();
        writer.start_file("share/fmt/usage", options).unwrap();
        writer.write_all(b"find_package(fmt CONFIG REQUIRED)\n").unwrap();
        writer.finish().unwrap();

        let dest = temp.path().join("out");
        extract(&archive_path, &dest).unwrap();
        assert!(dest.join("include").is_dir());
        assert_eq!(
            std::fs::read_to_string(dest.join("share/fmt/usage")).unwrap(),
            "find_package(fmt CONFIG REQUIRED)\n"
        );
    }

    #[test]
    fn test_extract_zip_skips_escaping_entries() {
        let temp = TempDir::new().unwrap();
        let archive_path = temp.path().join("pkg.zip");

        let mut writer = zip::ZipWriter::new(File::create(&archive_path).unwrap());
        let options = zip::write::FileOptions::default();
        writer.start_file("../escaped.txt", options).unwrap();
        writer.write_all(b"outside").unwrap();
        writer.start_file("CONTROL", options).unwrap();
        writer.write_all(CONTROL).unwrap();
        writer.finish().unwrap();

        let dest = temp.path().join("out");
        extract(&archive_path, &dest).unwrap();
        assert_eq!(std::fs::read(dest.join("CONTROL")).unwrap(), CONTROL);
        assert!(!temp.path().join("escaped.txt").exists());
        assert!(!dest.join("escaped.txt").exists());
    }

    #[test]
    fn test_extract_corrupt_archive() {
        let temp = TempDir::new().unwrap();
        let archive_path = temp.path().join("broken.tar.gz");
        std::fs::write(&archive_path, b"definitely not gzip").unwrap();

        let err = extract(&archive_path, &temp.path().join("out")).unwrap_err();
        assert!(matches!(err, CmakeScanError::Extraction(_)));
    }

    #[test]
    fn test_extract_corrupt_zip() {
        let temp = TempDir::new().unwrap();
        let archive_path = temp.path().join("broken.zip");
        std::fs::write(&archive_path, b"PK but not really a zip").unwrap();

        let err = extract(&archive_path, &temp.path().join("out")).unwrap_err();
        assert!(matches!(err, CmakeScanError::Extraction(_)));
        assert!(err.to_string().contains("broken.zip"));
    }

    #[test]
    fn test_extract_unsupported() {
        let temp = TempDir::new().unwrap();
        let archive_path = temp.path().join("pkg.rar");
        std::fs::write(&archive_path, b"rar").unwrap();

        let err = extract(&archive_path, &temp.path().join("out")).unwrap_err();
        assert!(matches!(err, CmakeScanError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_extract_missing() {
        let err = extract(Path::new("/does/not/exist.zip"), Path::new("/tmp/x")).unwrap_err();
        assert!(matches!(err, CmakeScanError::FileNotFound { .. }));
    }
}
