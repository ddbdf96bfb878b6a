//! Paragraph-format metadata parser
//!
//! Metadata files are blocks of `Key: value` fields separated by blank
//! lines. A line starting with a space or tab continues the previous field.

use std::collections::HashMap;

use crate::error::{CmakeScanError, Result};

/// One block of fields
pub type Paragraph = HashMap<String, String>;

/// A field being accumulated: key, value and the line it started on
type OpenField = (String, String, usize);

/// Parse metadata text into its ordered list of paragraphs
pub fn parse_paragraphs(text: &str) -> Result<Vec<Paragraph>> {
    let mut paragraphs = Vec::new();
    let mut fields = Paragraph::new();
    let mut current: Option<OpenField> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;

        if line.trim().is_empty() {
            close_field(&mut fields, current.take())?;
            if !fields.is_empty() {
                paragraphs.push(std::mem::take(&mut fields));
            }
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            // Continuation line
            match current.as_mut() {
                Some((_, value, _)) => {
                    value.push('\n');
                    value.push_str(line.trim());
                }
                None => {
                    return Err(CmakeScanError::paragraph(
                        line_no,
                        "continuation line without a preceding field",
                    ))
                }
            }
            continue;
        }

        let colon_pos = line.find(':').ok_or_else(|| {
            CmakeScanError::paragraph(line_no, format!("expected 'Key: value', found '{}'", line))
        })?;

        let key = line[..colon_pos].trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(CmakeScanError::paragraph(
                line_no,
                format!("invalid field name '{}'", key),
            ));
        }

        close_field(&mut fields, current.take())?;
        current = Some((
            key.to_string(),
            line[colon_pos + 1..].trim().to_string(),
            line_no,
        ));
    }

    close_field(&mut fields, current)?;
    if !fields.is_empty() {
        paragraphs.push(fields);
    }

    Ok(paragraphs)
}

fn close_field(fields: &mut Paragraph, field: Option<OpenField>) -> Result<()> {
    if let Some((key, value, line_no)) = field {
        if fields.contains_key(&key) {
            return Err(CmakeScanError::paragraph(
                line_no,
                format!("duplicate field '{}'", key),
            ));
        }
        fields.insert(key, value.trim().to_string());
    }
    Ok(())
}
