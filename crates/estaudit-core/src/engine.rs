//! Audit engine
//!
//! The map-then-merge driver: classify, evaluate, normalize, and compare
//! each scenario independently against the read-only reference index.

use crate::compare::compare;
use crate::evaluate::evaluate;
use crate::index::ReferenceIndex;
use crate::types::{ComparisonStatus, ScenarioInput, ScenarioOutcome};
use estaudit_link::{classify, normalize, NormalizedLink};
use indexmap::IndexSet;
use rayon::prelude::*;

/// The audit engine
///
/// Owns the immutable [`ReferenceIndex`] and maps scenario inputs to
/// outcomes. Scenarios never observe one another, so the sequential and
/// parallel drivers produce identical results in identical order.
#[derive(Debug)]
pub struct AuditEngine {
    index: ReferenceIndex,
}

impl AuditEngine {
    /// Create an engine around a built reference index
    #[inline]
    #[must_use]
    pub fn new(index: ReferenceIndex) -> Self {
        Self { index }
    }

    /// Access the underlying index
    #[inline]
    #[must_use]
    pub fn index(&self) -> &ReferenceIndex {
        &self.index
    }

    /// Audit a single scenario
    ///
    /// # Workflow
    /// 1. Classify every raw link
    /// 2. Evaluate the criteria verdict
    /// 3. Normalize the usable links
    /// 4. Compare against the reference index (passing scenarios only)
    #[must_use]
    pub fn audit(&self, input: &ScenarioInput) -> ScenarioOutcome {
        let categories: Vec<_> = input.raw_links.iter().map(|l| classify(l)).collect();

        let usable_links: Vec<&str> = input
            .raw_links
            .iter()
            .zip(&categories)
            .filter(|(_, c)| c.is_usable())
            .map(|(l, _)| l.trim())
            .collect();

        let verdict = evaluate(&categories);

        // Normalization cannot fail for links the classifier marked usable.
        let normalized_estimate_links: IndexSet<NormalizedLink> = usable_links
            .iter()
            .filter_map(|l| normalize(l).ok())
            .collect();

        let comparison_status = if verdict.passed() {
            compare(&self.index, &input.identity_key, &normalized_estimate_links)
        } else {
            ComparisonStatus::NotApplicable
        };

        tracing::debug!(
            identity_key = %input.identity_key,
            passed = verdict.passed(),
            status = ?comparison_status,
            usable = usable_links.len(),
            "audited scenario"
        );

        ScenarioOutcome {
            identity_key: input.identity_key.clone(),
            estimate_link: usable_links.join("\n"),
            categories,
            criteria_passed: verdict.passed(),
            failure_reason: verdict.failure_reason(),
            normalized_estimate_links,
            comparison_status,
        }
    }

    /// Audit a corpus of scenarios sequentially
    ///
    /// Output order matches input order.
    #[must_use]
    pub fn run(&self, inputs: &[ScenarioInput]) -> Vec<ScenarioOutcome> {
        tracing::info!(scenarios = inputs.len(), "running sequential audit");
        inputs.iter().map(|i| self.audit(i)).collect()
    }

    /// Audit a corpus of scenarios on the rayon thread pool
    ///
    /// Each input slot produces exactly one output slot, so the indexed
    /// collect keeps output order stable without any coordination.
    #[must_use]
    pub fn run_parallel(&self, inputs: &[ScenarioInput]) -> Vec<ScenarioOutcome> {
        tracing::info!(scenarios = inputs.len(), "running parallel audit");
        inputs.par_iter().map(|i| self.audit(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FailureReason, ReferenceRecord};

    const KEY: &str = "https://learn.microsoft.com/azure/architecture/example";

    fn engine_with_reference(links: Vec<&str>) -> AuditEngine {
        let (index, _) = ReferenceIndex::build(vec![ReferenceRecord::new(
            KEY,
            links.into_iter().map(String::from).collect(),
        )]);
        AuditEngine::new(index)
    }

    fn empty_engine() -> AuditEngine {
        AuditEngine::new(ReferenceIndex::default())
    }

    #[test]
    fn reports_original_link_text_not_normalized() {
        let engine = empty_engine();
        let raw = "https://azure.microsoft.com/pricing/calculator/?service=vm&wt.mc_id=docs";
        let outcome = engine.audit(&ScenarioInput::new(KEY, vec![raw.to_string()]));

        assert!(outcome.criteria_passed);
        assert_eq!(outcome.estimate_link, raw);
        assert_eq!(outcome.normalized_estimate_links.len(), 1);
    }

    #[test]
    fn joins_usable_links_in_discovery_order() {
        let engine = empty_engine();
        let outcome = engine.audit(&ScenarioInput::new(
            KEY,
            vec![
                "https://azure.com/e/first".to_string(),
                "https://learn.microsoft.com/skip-me".to_string(),
                "https://azure.com/e/second".to_string(),
            ],
        ));

        assert_eq!(
            outcome.estimate_link,
            "https://azure.com/e/first\nhttps://azure.com/e/second"
        );
    }

    #[test]
    fn failed_scenario_is_not_applicable_with_empty_normalized_set() {
        let engine = empty_engine();
        let outcome = engine.audit(&ScenarioInput::new(KEY, vec![]));

        assert!(!outcome.criteria_passed);
        assert_eq!(outcome.failure_reason, Some(FailureReason::NoEstimateLink));
        assert!(outcome.normalized_estimate_links.is_empty());
        assert_eq!(outcome.comparison_status, ComparisonStatus::NotApplicable);
    }

    #[test]
    fn passing_scenario_compares_against_index() {
        let engine = engine_with_reference(vec!["https://azure.com/e/known"]);
        let outcome = engine.audit(&ScenarioInput::new(
            KEY,
            vec!["https://azure.com/e/known/".to_string()],
        ));
        assert_eq!(
            outcome.comparison_status,
            ComparisonStatus::MatchedExistingScenarioSameEstimate
        );
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let engine = engine_with_reference(vec!["https://azure.com/e/known"]);
        let inputs: Vec<_> = (0..64)
            .map(|i| {
                ScenarioInput::new(
                    format!("https://learn.microsoft.com/azure/architecture/s{i}"),
                    vec![format!("https://azure.com/e/token{i}")],
                )
            })
            .collect();

        assert_eq!(engine.run(&inputs), engine.run_parallel(&inputs));
    }
}
