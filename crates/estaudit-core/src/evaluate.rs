//! Criteria evaluation
//!
//! Turns a scenario's classified links into a pass/fail verdict. The ladder
//! is strict three-way: any usable link wins outright; any bare tool link
//! (with no usable link) beats the empty case.

use crate::types::{CriteriaVerdict, FailureReason};
use estaudit_link::LinkCategory;

/// Evaluate a scenario's classified links
///
/// - Any usable category present → [`CriteriaVerdict::Passed`]
/// - Otherwise, any [`LinkCategory::CalculatorToolRoot`] →
///   failed with [`FailureReason::NoEstimateLinkCalculatorToolLinkOnly`]
/// - Otherwise (only `Other`, or no links at all) →
///   failed with [`FailureReason::NoEstimateLink`]
#[must_use]
pub fn evaluate(categories: &[LinkCategory]) -> CriteriaVerdict {
    if categories.iter().any(|c| c.is_usable()) {
        return CriteriaVerdict::Passed;
    }
    if categories
        .iter()
        .any(|c| *c == LinkCategory::CalculatorToolRoot)
    {
        return CriteriaVerdict::Failed(FailureReason::NoEstimateLinkCalculatorToolLinkOnly);
    }
    CriteriaVerdict::Failed(FailureReason::NoEstimateLink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use LinkCategory::*;

    #[test]
    fn usable_link_passes() {
        assert!(evaluate(&[ServiceScoped]).passed());
        assert!(evaluate(&[Other, SharedEstimate]).passed());
        assert!(evaluate(&[AzureExperience, Other, Other]).passed());
    }

    #[test]
    fn usable_wins_over_tool_root() {
        // Any number of tool-root links cannot demote a usable link
        let verdict = evaluate(&[CalculatorToolRoot, CalculatorToolRoot, ServiceScoped]);
        assert!(verdict.passed());
    }

    #[test]
    fn tool_root_only_fails_specifically() {
        let verdict = evaluate(&[Other, CalculatorToolRoot]);
        assert_eq!(
            verdict.failure_reason(),
            Some(FailureReason::NoEstimateLinkCalculatorToolLinkOnly)
        );
    }

    #[test]
    fn no_calculator_links_fails_generically() {
        assert_eq!(
            evaluate(&[Other, Other]).failure_reason(),
            Some(FailureReason::NoEstimateLink)
        );
    }

    #[test]
    fn empty_scenario_fails_generically() {
        assert_eq!(
            evaluate(&[]).failure_reason(),
            Some(FailureReason::NoEstimateLink)
        );
    }
}
