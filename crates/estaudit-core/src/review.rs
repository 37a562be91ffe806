//! Review subset collection
//!
//! Pure, order-preserving filter over scenario outcomes: drifted and novel
//! estimates go to the needs-review set for human follow-up.

use crate::types::ScenarioOutcome;

/// Collect the needs-review subset of outcomes
///
/// Keeps scenarios whose comparison status is
/// `matched_existing_scenario_new_estimate` or `new_estimate_candidate`,
/// in input order.
#[must_use]
pub fn collect_review_subset(outcomes: &[ScenarioOutcome]) -> Vec<ScenarioOutcome> {
    outcomes
        .iter()
        .filter(|o| o.comparison_status.needs_review())
        .cloned()
        .collect()
}
