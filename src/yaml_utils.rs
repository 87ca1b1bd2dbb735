//! YAML cleanup for exported session fixtures
//!
//! Session exports produced by scripting against timing libraries sometimes carry stray
//! control characters (from driver names scraped out of live feeds) and a UTF-8 byte order
//! mark. Both break strict YAML parsers, so every document is cleaned before parsing.

use crate::{PaddockError, Result};

/// Strip a leading BOM and control characters other than `\n`, `\r` and `\t`.
///
/// Returns an error when nothing but whitespace remains.
pub fn sanitize_yaml(yaml: &str) -> Result<String> {
    let yaml = yaml.strip_prefix('\u{feff}').unwrap_or(yaml);

    let mut result = String::with_capacity(yaml.len());
    for ch in yaml.chars() {
        match ch {
            '\x00'..='\x08' | '\x0B'..='\x0C' | '\x0E'..='\x1F' | '\x7F' => continue,
            _ => result.push(ch),
        }
    }

    if result.trim().is_empty() {
        return Err(PaddockError::parse("YAML preprocessing", "YAML is empty after preprocessing"));
    }

    Ok(result)
}
