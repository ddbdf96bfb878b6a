//! Escaping of text placed into report string fields

/// Escape carriage returns, line feeds and double quotes to their
/// two-character literal forms (`\r`, `\n`, `\"`).
///
/// Backslashes are left untouched, so text that contains none of the three
/// escaped characters comes back unchanged.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}
