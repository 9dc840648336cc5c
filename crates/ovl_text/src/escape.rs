//! Escaping of record text so every record fits on one line.

use crate::error::{Error, Result};

/// Escape backslashes, carriage returns and newlines
///
/// ```
/// assert_eq!(ovl_text::escape::escape("a\\b\r\nc"), r"a\\b\r\nc");
/// ```
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str(r"\\"),
            '\r' => escaped.push_str(r"\r"),
            '\n' => escaped.push_str(r"\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Reverse [`escape`]
pub fn unescape(text: &str) -> Result<String> {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }

        match chars.next() {
            Some('\\') => unescaped.push('\\'),
            Some('r') => unescaped.push('\r'),
            Some('n') => unescaped.push('\n'),
            Some(other) => return Err(Error::InvalidEscape(format!("\\{other}"))),
            None => return Err(Error::InvalidEscape("\\".to_owned())),
        }
    }
    Ok(unescaped)
}
