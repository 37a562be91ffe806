//! Comparison against the reference index
//!
//! For scenarios that passed the criteria check, decides whether the
//! scanned estimate is already known, has drifted, or is entirely new.

use crate::index::ReferenceIndex;
use crate::types::ComparisonStatus;
use estaudit_link::NormalizedLink;
use indexmap::IndexSet;

/// Compare a passing scenario's normalized links against the index
///
/// - Key absent from the index → [`ComparisonStatus::NewEstimateCandidate`]
/// - Any scanned link present in the reference set →
///   [`ComparisonStatus::MatchedExistingScenarioSameEstimate`]
/// - Otherwise → [`ComparisonStatus::MatchedExistingScenarioNewEstimate`]
///
/// This is a set-intersection test: a scenario carrying several cost
/// variants matches as soon as any one of them matches. Link order is
/// irrelevant.
#[must_use]
pub fn compare(
    index: &ReferenceIndex,
    identity_key: &str,
    normalized_links: &IndexSet<NormalizedLink>,
) -> ComparisonStatus {
    let Some(reference) = index.lookup(identity_key) else {
        return ComparisonStatus::NewEstimateCandidate;
    };

    if normalized_links.iter().any(|link| reference.contains(link)) {
        ComparisonStatus::MatchedExistingScenarioSameEstimate
    } else {
        ComparisonStatus::MatchedExistingScenarioNewEstimate
    }
}
