//! Store document codecs.
//!
//! Both formats hold one flat level of string values. Anything else (nested
//! tables, numbers, arrays) is rejected with [`FormatError::NotFlat`] rather
//! than coerced.
//!
//! Rendering TOML takes the previous document text, if any, and patches it
//! with `toml_edit` so comments and layout of untouched keys survive.

use indexmap::IndexMap;

use crate::reconcile::Mapping;
use crate::types::StoreFormat;

/// Why a document could not be read as a flat mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    Syntax(String),
    NotFlat(String),
}

/// Parse a document into a mapping, preserving key order.
pub fn parse_document(content: &str, format: StoreFormat) -> Result<Mapping, FormatError> {
    match format {
        StoreFormat::Json => parse_json(content),
        StoreFormat::Toml => parse_toml(content),
    }
}

/// Render `mapping` as a document.
///
/// `previous` is the current file content; the TOML renderer patches it in
/// place when it parses. JSON output is always rewritten in full.
pub fn render_document(mapping: &Mapping, previous: Option<&str>, format: StoreFormat) -> String {
    match format {
        StoreFormat::Json => render_json(mapping),
        StoreFormat::Toml => render_toml(mapping, previous),
    }
}

fn parse_json(content: &str) -> Result<Mapping, FormatError> {
    let raw: IndexMap<String, serde_json::Value> =
        serde_json::from_str(content).map_err(|e| FormatError::Syntax(e.to_string()))?;

    raw.into_iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(s) => Ok((key, s)),
            _ => Err(FormatError::NotFlat(key)),
        })
        .collect()
}

fn render_json(mapping: &Mapping) -> String {
    // A map of strings always serializes.
    let mut out = serde_json::to_string_pretty(mapping).unwrap_or_else(|_| "{}".to_string());
    out.push('\n');
    out
}

fn parse_toml(content: &str) -> Result<Mapping, FormatError> {
    let doc: toml_edit::DocumentMut = content
        .parse()
        .map_err(|e: toml_edit::TomlError| FormatError::Syntax(e.to_string()))?;

    doc.iter()
        .map(|(key, item)| match item.as_str() {
            Some(s) => Ok((key.to_string(), s.to_string())),
            None => Err(FormatError::NotFlat(key.to_string())),
        })
        .collect()
}

fn render_toml(mapping: &Mapping, previous: Option<&str>) -> String {
    let mut doc: toml_edit::DocumentMut = previous
        .and_then(|c| c.parse().ok())
        .unwrap_or_else(toml_edit::DocumentMut::new);

    let stale: Vec<String> = doc
        .iter()
        .map(|(key, _)| key.to_string())
        .filter(|key| !mapping.contains_key(key))
        .collect();
    for key in stale {
        doc.remove(&key);
    }

    for (key, value) in mapping {
        // Only touch changed entries so their decor is kept.
        if doc.get(key).and_then(|item| item.as_str()) != Some(value.as_str()) {
            doc[key.as_str()] = toml_edit::value(value.as_str());
        }
    }

    // New keys land at the end; follow the mapping's order instead. The sort
    // is stable and carries each entry's decor along.
    doc.sort_values_by(|a, _, b, _| {
        mapping
            .get_index_of(a.get())
            .cmp(&mapping.get_index_of(b.get()))
    });

    doc.to_string()
}
