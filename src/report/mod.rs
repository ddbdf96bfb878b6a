//! Aggregated report rendering
//!
//! The report is an object literal keyed by resolved package name:
//!
//! ```text
//! {
//!     "fmt": { "name": "fmt", "targets": ["fmt::fmt"], "portName": "fmt",
//!              "portDescription": "...", "usage": "..." },
//!     "_headers": { "name": "_headers", "targets": [], "portName": "headers",
//!                   "portDescription": "", "usage": "" }
//! }
//! ```
//!
//! Each entry is rendered on a single line; the example above is wrapped.
//!
//! Entries keep record order, then package order inside a record. Two
//! archives resolving to the same package name both appear, so the literal
//! holds a repeated key in that case.

use std::collections::HashSet;
use std::fmt::{self, Write as _};
use std::io::Write;

use crate::escape::escape;
use crate::models::{PackageRecord, ReportEntry};

/// The aggregated report over all processed archives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Entries in emission order
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a report from records in the order they were produced
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PackageRecord>) -> Self {
        let mut report = Self::new();
        for record in records {
            report.push_record(record);
        }
        report
    }

    /// Append the entries of one finalized record
    pub fn push_record(&mut self, record: &PackageRecord) {
        self.entries.extend(record_entries(record));
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Package names that appear more than once, in first-repeat order
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates: Vec<&str> = Vec::new();

        for entry in &self.entries {
            let name = entry.name.as_str();
            if !seen.insert(name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }

        duplicates
    }

    /// Write the report followed by a trailing newline
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "{}", self)?;
        writer.flush()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.entries.iter().map(render_entry).collect();

        if lines.is_empty() {
            write!(f, "{{\n}}")
        } else {
            write!(f, "{{\n{}\n}}", lines.join(",\n"))
        }
    }
}

/// Report entries for one finalized record.
///
/// A record without any package yields a single `_<port>` placeholder so the
/// port is still listed.
pub fn record_entries(record: &PackageRecord) -> Vec<ReportEntry> {
    if record.target_map.is_empty() {
        return vec![ReportEntry {
            name: record.placeholder_name(),
            targets: Vec::new(),
            port_name: record.port_name.clone(),
            port_description: record.port_description.clone(),
            usage: record.usage_text.clone(),
        }];
    }

    record
        .target_map
        .iter()
        .map(|(find_package_name, targets)| {
            let mut targets = targets.clone();
            targets.sort();

            ReportEntry {
                name: record.package_name(find_package_name).to_string(),
                targets,
                port_name: record.port_name.clone(),
                port_description: record.port_description.clone(),
                usage: record.usage_text.clone(),
            }
        })
        .collect()
}

/// Render one `"key": { ... }` line.
///
/// Description and usage arrive escaped. Names come from file and directory
/// names or control fields and are escaped here.
fn render_entry(entry: &ReportEntry) -> String {
    let name = escape(&entry.name);

    let mut targets = String::new();
    for (i, target) in entry.targets.iter().enumerate() {
        if i > 0 {
            targets.push_str(", ");
        }
        let _ = write!(targets, "\"{}\"", escape(target));
    }

    format!(
        "    \"{}\": {{ \"name\": \"{}\", \"targets\": [{}], \
         \"portName\": \"{}\", \"portDescription\": \"{}\", \"usage\": \"{}\" }}",
        name,
        name,
        targets,
        escape(&entry.port_name),
        entry.port_description,
        entry.usage
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foo_record() -> PackageRecord {
        let mut record = PackageRecord::new("foo");
        record.add_target("foo", "foo::baz");
        record.add_target("foo", "foo::bar");
        record.config_map.insert("foo".into(), "foo".into());
        record.usage_text = "usage".into();
        record
    }

    #[test]
    fn test_entries_resolve_and_sort() {
        let entries = record_entries(&foo_record());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "foo");
        assert_eq!(entries[0].targets, vec!["foo::bar", "foo::baz"]);
    }

    #[test]
    fn test_unmatched_config_falls_back_to_directory() {
        let mut record = PackageRecord::new("qux");
        record.add_target("bar", "qux");

        let entries = record_entries(&record);
        assert_eq!(entries[0].name, "bar");
    }

    #[test]
    fn test_placeholder_entry() {
        let mut record = PackageRecord::new("headers");
        record.port_description = "Only headers".into();

        let entries = record_entries(&record);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "_headers");
        assert!(entries[0].targets.is_empty());
        assert_eq!(entries[0].port_name, "headers");
        assert_eq!(entries[0].port_description, "Only headers");
    }

    #[test]
    fn test_render_report() {
        let report = Report::from_records(&[foo_record()]);

        assert_eq!(
            report.to_string(),
            "{\n    \"foo\": { \"name\": \"foo\", \"targets\": [\"foo::bar\", \"foo::baz\"], \
             \"portName\": \"foo\", \"portDescription\": \"\", \"usage\": \"usage\" }\n}"
        );
    }

    #[test]
    fn test_render_empty_targets_and_report() {
        assert_eq!(Report::new().to_string(), "{\n}");

        let report = Report::from_records(&[PackageRecord::new("headers")]);
        assert!(report.to_string().contains("\"targets\": []"));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let report = Report::from_records(&[foo_record(), foo_record(), PackageRecord::new("x")]);

        assert_eq!(report.len(), 3);
        assert_eq!(report.duplicate_names(), vec!["foo"]);
        assert_eq!(report.to_string().matches("\"foo\": {").count(), 2);
    }

    #[test]
    fn test_write_to_appends_newline() {
        let mut out = Vec::new();
        Report::new().write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n}\n");
    }
}
