//! Scan report assembly and serialization
//!
//! Merges extraction records with audit outcomes into flat report rows,
//! computes the run summary, and writes the JSON artifacts (results,
//! needs-review subset, optional debug dump).

use anyhow::Context;
use chrono::{DateTime, Utc};
use estaudit_core::{
    AuditEngine, ComparisonStatus, FailureReason, IndexWarning, ScenarioOutcome,
};
use estaudit_ingest::{ExtractionFailure, ImageAsset, ScenarioRecord};
use estaudit_link::LinkCategory;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Why a report row is marked failed
///
/// Extraction-stage and criteria-stage reasons share one column; the wire
/// names are disjoint so the untagged form is unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowFailure {
    /// Extraction stopped before the audit could run
    Extraction(ExtractionFailure),
    /// The audit ran and the criteria check failed
    Criteria(FailureReason),
}

/// One flat row of the scan report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub identity_key: String,
    pub yml_path: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub yml_github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub include_md_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub include_md_github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub azure_categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ms_author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ms_date: Option<String>,

    /// Usable raw links, newline-joined in discovery order
    pub estimate_link: String,
    #[serde(default)]
    pub link_categories: Vec<LinkCategory>,
    #[serde(default)]
    pub images: Vec<ImageAsset>,

    pub criteria_passed: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub failure_reason: Option<RowFailure>,
    pub comparison_status: ComparisonStatus,
}

/// Run-level counters for the one-line summary of a scan or compare pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total: usize,
    pub extracted: usize,
    pub criteria_passed: usize,
    pub same_estimate: usize,
    pub new_estimate: usize,
    pub new_candidates: usize,
    pub needs_review: usize,
}

impl ScanSummary {
    /// Tally rows into a summary
    #[must_use]
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        let mut summary = Self {
            total: rows.len(),
            ..Self::default()
        };
        for row in rows {
            if !matches!(row.failure_reason, Some(RowFailure::Extraction(_))) {
                summary.extracted += 1;
            }
            if row.criteria_passed {
                summary.criteria_passed += 1;
            }
            match row.comparison_status {
                ComparisonStatus::MatchedExistingScenarioSameEstimate => summary.same_estimate += 1,
                ComparisonStatus::MatchedExistingScenarioNewEstimate => summary.new_estimate += 1,
                ComparisonStatus::NewEstimateCandidate => summary.new_candidates += 1,
                ComparisonStatus::NotApplicable => {}
            }
            if row.comparison_status.needs_review() {
                summary.needs_review += 1;
            }
        }
        summary
    }
}

/// The scan-results artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub branch: Option<String>,
    pub docs_root: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub inventory: Option<String>,
    #[serde(default)]
    pub index_warnings: Vec<String>,
    pub summary: ScanSummary,
    pub items: Vec<ReportRow>,
}

/// Run the audit over extracted records and assemble report rows
///
/// Every record is audited, so the link columns stay populated even for
/// rows that failed extraction. An extraction failure still overrides the
/// verdict: such rows report failed with the extraction reason and
/// `not_applicable` status (the image gate fires before the link gate).
#[must_use]
pub fn build_rows(engine: &AuditEngine, records: &[ScenarioRecord], parallel: bool) -> Vec<ReportRow> {
    let inputs: Vec<_> = records.iter().map(ScenarioRecord::to_input).collect();
    let outcomes = if parallel {
        engine.run_parallel(&inputs)
    } else {
        engine.run(&inputs)
    };

    records
        .iter()
        .zip(outcomes)
        .map(|(record, outcome)| merge_row(record, outcome))
        .collect()
}

fn merge_row(record: &ScenarioRecord, outcome: ScenarioOutcome) -> ReportRow {
    let (criteria_passed, failure_reason, comparison_status) = match record.extraction_failure {
        Some(failure) => (
            false,
            Some(RowFailure::Extraction(failure)),
            ComparisonStatus::NotApplicable,
        ),
        None => (
            outcome.criteria_passed,
            outcome.failure_reason.map(RowFailure::Criteria),
            outcome.comparison_status,
        ),
    };

    ReportRow {
        identity_key: record.identity_key.clone(),
        yml_path: record.yml_path.clone(),
        yml_github_url: record.yml_github_url.clone(),
        include_md_path: record.include_md_path.clone(),
        include_md_github_url: record.include_md_github_url.clone(),
        title: record.metadata.title.clone(),
        description: record.metadata.description.clone(),
        azure_categories: record.metadata.azure_categories.clone(),
        author: record.metadata.author.clone(),
        ms_author: record.metadata.ms_author.clone(),
        ms_date: record.metadata.ms_date.clone(),
        estimate_link: outcome.estimate_link,
        link_categories: outcome.categories,
        images: record.images.clone(),
        criteria_passed,
        failure_reason,
        comparison_status,
    }
}

/// Assemble the full report artifact
#[must_use]
pub fn build_report(
    repo: &str,
    branch: &str,
    docs_root: &str,
    inventory: Option<&str>,
    index_warnings: &[IndexWarning],
    rows: Vec<ReportRow>,
) -> ScanReport {
    ScanReport {
        generated_at: Utc::now(),
        repo: Some(repo.to_string()),
        branch: Some(branch.to_string()),
        docs_root: docs_root.to_string(),
        inventory: inventory.map(str::to_string),
        index_warnings: index_warnings.iter().map(ToString::to_string).collect(),
        summary: ScanSummary::from_rows(&rows),
        items: rows,
    }
}

/// The needs-review subset of report rows, in report order
#[must_use]
pub fn review_rows(rows: &[ReportRow]) -> Vec<ReportRow> {
    rows.iter()
        .filter(|r| r.comparison_status.needs_review())
        .cloned()
        .collect()
}

/// Serialize a report artifact to pretty JSON
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing report")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Read a previously written scan report
pub fn read_report(path: &Path) -> anyhow::Result<ScanReport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scan results {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing scan results {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use estaudit_core::{collect_review_subset, ReferenceIndex, ScenarioInput};
    use estaudit_ingest::ScenarioMetadata;

    fn record(key: &str, links: &[&str], failure: Option<ExtractionFailure>) -> ScenarioRecord {
        ScenarioRecord {
            identity_key: key.to_string(),
            yml_path: "docs/demo.yml".to_string(),
            yml_github_url: Some("https://github.com/Example/docs-repo/blob/main/docs/demo.yml".to_string()),
            include_md_path: Some("docs/demo-content.md".to_string()),
            include_md_github_url: None,
            metadata: ScenarioMetadata::default(),
            raw_links: links.iter().map(|s| s.to_string()).collect(),
            images: vec![ImageAsset {
                reference: "media/diagram.png".to_string(),
                repo_path: "docs/media/diagram.png".to_string(),
                download_url: Some(
                    "https://raw.githubusercontent.com/Example/docs-repo/main/docs/media/diagram.png"
                        .to_string(),
                ),
                exists_in_repo: true,
                format: "png".to_string(),
            }],
            extraction_failure: failure,
        }
    }

    fn engine() -> AuditEngine {
        AuditEngine::new(ReferenceIndex::default())
    }

    #[test]
    fn extraction_failure_overrides_verdict() {
        let records = vec![record(
            "https://learn.microsoft.com/azure/architecture/demo",
            &["https://azure.com/e/tok"],
            Some(ExtractionFailure::NoImagesFound),
        )];

        let rows = build_rows(&engine(), &records, false);
        assert!(!rows[0].criteria_passed);
        assert_eq!(
            rows[0].failure_reason,
            Some(RowFailure::Extraction(ExtractionFailure::NoImagesFound))
        );
        assert_eq!(rows[0].comparison_status, ComparisonStatus::NotApplicable);
        // Link columns stay populated for triage
        assert_eq!(rows[0].estimate_link, "https://azure.com/e/tok");
    }

    #[test]
    fn clean_record_reports_engine_outcome() {
        let records = vec![record(
            "https://learn.microsoft.com/azure/architecture/demo",
            &["https://azure.com/e/tok"],
            None,
        )];

        let rows = build_rows(&engine(), &records, false);
        assert!(rows[0].criteria_passed);
        assert_eq!(rows[0].comparison_status, ComparisonStatus::NewEstimateCandidate);
    }

    #[test]
    fn rows_carry_source_urls_and_image_columns() {
        let records = vec![record(
            "https://learn.microsoft.com/azure/architecture/demo",
            &["https://azure.com/e/tok"],
            None,
        )];

        let rows = build_rows(&engine(), &records, false);
        assert_eq!(
            rows[0].yml_github_url.as_deref(),
            Some("https://github.com/Example/docs-repo/blob/main/docs/demo.yml")
        );
        assert_eq!(rows[0].images.len(), 1);
        assert_eq!(
            rows[0].images[0].download_url.as_deref(),
            Some("https://raw.githubusercontent.com/Example/docs-repo/main/docs/media/diagram.png")
        );
        assert!(rows[0].images[0].exists_in_repo);
        assert_eq!(rows[0].images[0].format, "png");
    }

    #[test]
    fn summary_counts_add_up() {
        let records = vec![
            record("https://a", &["https://azure.com/e/x"], None),
            record("https://b", &[], None),
            record("https://c", &["https://azure.com/e/y"], Some(ExtractionFailure::NoImagesFound)),
        ];

        let rows = build_rows(&engine(), &records, false);
        let summary = ScanSummary::from_rows(&rows);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.extracted, 2);
        assert_eq!(summary.criteria_passed, 1);
        assert_eq!(summary.new_candidates, 1);
        assert_eq!(summary.needs_review, 1);
    }

    #[test]
    fn failure_reason_wire_forms_are_disjoint() {
        let extraction = serde_json::to_string(&RowFailure::Extraction(
            ExtractionFailure::YamlParseFailed,
        ))
        .unwrap();
        assert_eq!(extraction, "\"yaml_parse_failed\"");

        let criteria =
            serde_json::to_string(&RowFailure::Criteria(FailureReason::NoEstimateLink)).unwrap();
        assert_eq!(criteria, "\"no_estimate_link\"");

        let back: RowFailure = serde_json::from_str("\"no_estimate_link\"").unwrap();
        assert_eq!(back, RowFailure::Criteria(FailureReason::NoEstimateLink));
        let back: RowFailure = serde_json::from_str("\"include_md_missing\"").unwrap();
        assert_eq!(
            back,
            RowFailure::Extraction(ExtractionFailure::IncludeMdMissing)
        );
    }

    #[test]
    fn review_rows_match_core_collector() {
        let records = vec![
            record("https://a", &["https://azure.com/e/x"], None),
            record("https://b", &[], None),
        ];
        let e = engine();
        let rows = build_rows(&e, &records, false);

        let inputs: Vec<ScenarioInput> = records.iter().map(ScenarioRecord::to_input).collect();
        let outcomes = e.run(&inputs);
        let core_subset = collect_review_subset(&outcomes);

        let row_subset = review_rows(&rows);
        assert_eq!(row_subset.len(), core_subset.len());
        assert_eq!(row_subset[0].identity_key, core_subset[0].identity_key);
    }
}
