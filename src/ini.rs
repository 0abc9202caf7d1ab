//! INI configuration documents.
//!
//! Each configuration file found by the scanner is parsed into a
//! [`ConfigDocument`] and handed to the driver's `create` entry point. drvfs
//! itself only reads `[main] driver_name`; every other key belongs to the driver.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};

use crate::error::{DrvFsError, DrvFsErrorKind, Result};

/// Read access to a parsed configuration document.
pub trait ConfigDocument {
    /// Value of `key` in `section`, if present.
    fn get_string(&self, section: &str, key: &str) -> Option<&str>;

    fn get_u32(&self, section: &str, key: &str) -> Option<u32> {
        self.get_string(section, key)?.parse().ok()
    }
}

/// Minimal INI document: `[section]` headers, `key = value` pairs, `;` and `#`
/// comments. Keys that appear before the first header belong to the section `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut document = Self::new();
        let mut section = String::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header.strip_suffix(']').ok_or_else(|| {
                    DrvFsError::new(
                        DrvFsErrorKind::General,
                        format!("line {}: unterminated section header", index + 1),
                    )
                })?;
                section = name.trim().to_string();
                document.sections.entry(section.clone()).or_default();
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| {
                DrvFsError::new(
                    DrvFsErrorKind::General,
                    format!("line {}: expected 'key = value'", index + 1),
                )
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(DrvFsError::new(
                    DrvFsErrorKind::General,
                    format!("line {}: empty key", index + 1),
                ));
            }
            document.set(&section, key, unquote(value.trim()));
        }

        Ok(document)
    }

    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }
}

impl ConfigDocument for IniDocument {
    fn get_string(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections_and_keys() {
        let doc = IniDocument::parse(
            "; clock configuration\n\
             [main]\n\
             driver_name = dmclk\n\
             \n\
             [dmclk]\n\
             frequency=8000000\n\
             # trailing comment\n",
        )
        .unwrap();

        assert_eq!(doc.get_string("main", "driver_name"), Some("dmclk"));
        assert_eq!(doc.get_u32("dmclk", "frequency"), Some(8_000_000));
        assert_eq!(doc.get_string("main", "missing"), None);
        assert_eq!(doc.get_string("other", "driver_name"), None);
    }

    #[test]
    fn test_keys_before_header_and_quotes() {
        let doc = IniDocument::parse("name = \"spi bus\"\n[main]\n").unwrap();
        assert_eq!(doc.get_string("", "name"), Some("spi bus"));
        assert!(doc.has_section("main"));
    }

    #[test]
    fn test_malformed_lines_are_rejected() {
        let err = IniDocument::parse("[main\n").unwrap_err();
        assert_eq!(err.kind, DrvFsErrorKind::General);

        let err = IniDocument::parse("[main]\njust text\n").unwrap_err();
        assert!(err.message.contains("line 2"));

        assert!(IniDocument::parse("[main]\n = value\n").is_err());
    }
}
