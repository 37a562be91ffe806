//! Reference index
//!
//! In-memory mapping from canonical scenario identity key to the set of
//! normalized estimate links the inventory records for that scenario.
//! Built once per run from the inventory, read-only thereafter; it is
//! passed by reference into the comparator, never mutated.

use crate::types::ReferenceRecord;
use estaudit_link::{canonical_scenario_key, normalize, NormalizedLink};
use indexmap::{IndexMap, IndexSet};
use tracing::warn;

/// Data-quality signals raised while building the index
///
/// None of these abort the build; the caller decides whether to surface
/// them. Each warning is also emitted through `tracing`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexWarning {
    /// Two inventory records share an identity key; the later record won
    #[error("duplicate inventory key (last record wins): {identity_key}")]
    DuplicateKey {
        /// The colliding canonical key
        identity_key: String,
    },

    /// An inventory link is not a usable estimate link and was skipped
    #[error("unusable inventory link for {identity_key}: {raw_link}")]
    UnusableInventoryLink {
        /// Canonical key of the record carrying the link
        identity_key: String,
        /// The offending link text
        raw_link: String,
    },

    /// A record carried no usable links at all and produced no entry
    #[error("inventory record with no usable links: {identity_key}")]
    EmptyRecord {
        /// Canonical key of the empty record
        identity_key: String,
    },
}

/// Read-only index over the reference inventory
///
/// Keys are canonicalized through [`canonical_scenario_key`]; links are
/// normalized through the same normalizer as scanned links, which is what
/// makes the two sides comparable at all.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    entries: IndexMap<String, IndexSet<NormalizedLink>>,
}

impl ReferenceIndex {
    /// Build the index from inventory records
    ///
    /// Duplicate identity keys follow last-wins with a recorded
    /// [`IndexWarning::DuplicateKey`]; links that fail normalization are
    /// skipped with a warning rather than silently dropped.
    #[must_use]
    pub fn build(records: impl IntoIterator<Item = ReferenceRecord>) -> (Self, Vec<IndexWarning>) {
        let mut entries: IndexMap<String, IndexSet<NormalizedLink>> = IndexMap::new();
        let mut warnings = Vec::new();

        for record in records {
            let key = canonical_scenario_key(&record.identity_key);
            if key.is_empty() {
                continue;
            }

            let mut links = IndexSet::new();
            for raw in &record.estimate_links {
                match normalize(raw) {
                    Ok(normalized) => {
                        links.insert(normalized);
                    }
                    Err(_) => {
                        if !raw.trim().is_empty() {
                            warn!(identity_key = %key, raw_link = %raw, "skipping unusable inventory link");
                            warnings.push(IndexWarning::UnusableInventoryLink {
                                identity_key: key.clone(),
                                raw_link: raw.clone(),
                            });
                        }
                    }
                }
            }

            if links.is_empty() {
                warn!(identity_key = %key, "inventory record has no usable links");
                warnings.push(IndexWarning::EmptyRecord {
                    identity_key: key.clone(),
                });
                continue;
            }

            if entries.insert(key.clone(), links).is_some() {
                warn!(identity_key = %key, "duplicate inventory key, keeping last record");
                warnings.push(IndexWarning::DuplicateKey { identity_key: key });
            }
        }

        (Self { entries }, warnings)
    }

    /// Look up the normalized link set for a scenario
    ///
    /// The key is canonicalized before lookup, so callers may pass the raw
    /// article URL.
    #[must_use]
    pub fn lookup(&self, identity_key: &str) -> Option<&IndexSet<NormalizedLink>> {
        self.entries.get(&canonical_scenario_key(identity_key))
    }

    /// Number of scenarios in the index
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no scenarios
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "https://learn.microsoft.com/azure/architecture/example";
    const ESTIMATE: &str = "https://azure.microsoft.com/pricing/calculator?shared-estimate=abc";

    #[test]
    fn build_and_lookup() {
        let (index, warnings) =
            ReferenceIndex::build(vec![ReferenceRecord::new(KEY, vec![ESTIMATE.to_string()])]);
        assert!(warnings.is_empty());
        assert_eq!(index.len(), 1);

        let links = index.lookup(KEY).unwrap();
        assert_eq!(links.len(), 1);
        assert!(links.contains(&normalize(ESTIMATE).unwrap()));
    }

    #[test]
    fn lookup_canonicalizes_key() {
        let (index, _) =
            ReferenceIndex::build(vec![ReferenceRecord::new(KEY, vec![ESTIMATE.to_string()])]);

        // Trailing slash and host casing on the query side still join
        let noisy = "https://LEARN.microsoft.com/azure/architecture/example/";
        assert!(index.lookup(noisy).is_some());
    }

    #[test]
    fn duplicate_key_last_wins_with_warning() {
        let older = "https://azure.com/e/older1";
        let newer = "https://azure.com/e/newer2";
        let (index, warnings) = ReferenceIndex::build(vec![
            ReferenceRecord::new(KEY, vec![older.to_string()]),
            ReferenceRecord::new(KEY, vec![newer.to_string()]),
        ]);

        assert_eq!(index.len(), 1);
        assert!(warnings
            .iter()
            .any(|w| matches!(w, IndexWarning::DuplicateKey { .. })));

        let links = index.lookup(KEY).unwrap();
        assert!(links.contains(&normalize(newer).unwrap()));
        assert!(!links.contains(&normalize(older).unwrap()));
    }

    #[test]
    fn unusable_links_are_skipped_with_warning() {
        let (index, warnings) = ReferenceIndex::build(vec![ReferenceRecord::new(
            KEY,
            vec!["not a url".to_string(), ESTIMATE.to_string()],
        )]);

        assert_eq!(index.len(), 1);
        assert!(warnings
            .iter()
            .any(|w| matches!(w, IndexWarning::UnusableInventoryLink { .. })));
    }

    #[test]
    fn record_with_no_usable_links_produces_no_entry() {
        let (index, warnings) = ReferenceIndex::build(vec![ReferenceRecord::new(
            KEY,
            vec!["https://azure.microsoft.com/pricing/calculator".to_string()],
        )]);

        assert!(index.is_empty());
        assert!(warnings
            .iter()
            .any(|w| matches!(w, IndexWarning::EmptyRecord { .. })));
    }

    #[test]
    fn blank_links_are_ignored_silently() {
        let (index, warnings) = ReferenceIndex::build(vec![ReferenceRecord::new(
            KEY,
            vec!["".to_string(), "  ".to_string(), ESTIMATE.to_string()],
        )]);

        assert_eq!(index.len(), 1);
        assert!(warnings.is_empty());
    }
}
