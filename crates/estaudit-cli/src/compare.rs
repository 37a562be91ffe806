//! Compare-only pass
//!
//! Recomputes comparison statuses over an existing scan-results file
//! against a (possibly updated) inventory, without rescanning the corpus.
//! Only rows with `criteria_passed == true` are touched; everything the
//! extraction and criteria stages decided stands.

use crate::report::{ScanReport, ScanSummary};
use chrono::Utc;
use estaudit_core::{compare, ComparisonStatus, IndexWarning, ReferenceIndex, ReferenceRecord};
use estaudit_ingest::split_estimate_links;
use estaudit_link::{normalize, NormalizedLink};
use indexmap::IndexSet;
use tracing::info;

/// Re-run the comparison stage over a loaded report
///
/// Returns the index warnings so the caller can surface them.
pub fn recompare(report: &mut ScanReport, records: Vec<ReferenceRecord>) -> Vec<IndexWarning> {
    let (index, warnings) = ReferenceIndex::build(records);
    info!(reference_scenarios = index.len(), rows = report.items.len(), "recomputing comparison");

    for row in &mut report.items {
        if !row.criteria_passed {
            row.comparison_status = ComparisonStatus::NotApplicable;
            continue;
        }

        let normalized: IndexSet<NormalizedLink> = split_estimate_links(&row.estimate_link)
            .iter()
            .filter_map(|l| normalize(l).ok())
            .collect();

        row.comparison_status = compare(&index, &row.identity_key, &normalized);
    }

    report.summary = ScanSummary::from_rows(&report.items);
    report.generated_at = Utc::now();
    report.index_warnings = warnings.iter().map(ToString::to_string).collect();
    warnings
}
