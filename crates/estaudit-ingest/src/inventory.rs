//! Reference inventory loading
//!
//! The inventory is a JSON array of known scenarios and their recorded
//! estimate links. A record's link cell may hold several links delimited
//! by newlines or semicolons (spreadsheet heritage); both a single string
//! and an array are accepted.

use crate::error::IngestError;
use estaudit_core::ReferenceRecord;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RawInventoryRecord {
    #[serde(alias = "yml_url")]
    identity_key: String,

    #[serde(default, alias = "estimate_links")]
    estimate_link: LinkCell,
}

#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum LinkCell {
    #[default]
    Empty,
    One(String),
    Many(Vec<String>),
}

impl LinkCell {
    fn into_links(self) -> Vec<String> {
        match self {
            Self::Empty => Vec::new(),
            Self::One(cell) => split_estimate_links(&cell),
            Self::Many(cells) => {
                let mut out = Vec::new();
                for cell in cells {
                    for link in split_estimate_links(&cell) {
                        if !out.contains(&link) {
                            out.push(link);
                        }
                    }
                }
                out
            }
        }
    }
}

/// Split a multi-link inventory cell
///
/// Supports newline- and semicolon-delimited values; preserves order and
/// drops duplicates and blanks.
#[must_use]
pub fn split_estimate_links(cell: &str) -> Vec<String> {
    let mut out = Vec::new();
    for chunk in cell.replace(';', "\n").lines() {
        let link = chunk.trim();
        if link.is_empty() {
            continue;
        }
        if !out.iter().any(|l: &String| l == link) {
            out.push(link.to_string());
        }
    }
    out
}

/// Load the reference inventory from a JSON file
///
/// Records without an identity key are skipped; a file yielding no usable
/// records at all is fatal, per the propagation policy (total absence of
/// inventory data aborts the run).
///
/// # Errors
/// [`IngestError::Io`] / [`IngestError::InvalidInventory`] /
/// [`IngestError::EmptyInventory`]
pub fn load_inventory(path: &Path) -> Result<Vec<ReferenceRecord>, IngestError> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::io_error(path, e))?;

    let raw: Vec<RawInventoryRecord> =
        serde_json::from_str(&text).map_err(|e| IngestError::InvalidInventory {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let records: Vec<ReferenceRecord> = raw
        .into_iter()
        .filter(|r| !r.identity_key.trim().is_empty())
        .map(|r| ReferenceRecord::new(r.identity_key, r.estimate_link.into_links()))
        .collect();

    if records.is_empty() {
        return Err(IngestError::EmptyInventory(path.to_path_buf()));
    }

    debug!(records = records.len(), path = %path.display(), "loaded inventory");
    Ok(records)
}
