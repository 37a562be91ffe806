//! Core data model
//!
//! Closed enums for verdicts, failure reasons, and comparison statuses, plus
//! the per-scenario input and outcome records exchanged with the extraction
//! and reporting layers. Adding a category or status variant is intended to
//! be a compile-time exhaustive-match exercise, never a string fallthrough.

use estaudit_link::{LinkCategory, NormalizedLink};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Why a scenario failed the criteria check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Calculator-domain links exist, but only bare tool links
    NoEstimateLinkCalculatorToolLinkOnly,

    /// No calculator-domain links at all
    NoEstimateLink,
}

/// Pass/fail verdict of the criteria evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaVerdict {
    /// At least one usable estimate link is present
    Passed,

    /// No usable estimate link
    Failed(FailureReason),
}

impl CriteriaVerdict {
    /// Whether the scenario passed
    #[inline]
    #[must_use]
    pub fn passed(self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Failure reason, when failed
    #[inline]
    #[must_use]
    pub fn failure_reason(self) -> Option<FailureReason> {
        match self {
            Self::Passed => None,
            Self::Failed(reason) => Some(reason),
        }
    }
}

/// Result of comparing a passing scenario against the reference index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    /// Known scenario, at least one scanned link matches the inventory
    MatchedExistingScenarioSameEstimate,

    /// Known scenario, none of the scanned links match the inventory
    MatchedExistingScenarioNewEstimate,

    /// Scenario absent from the inventory
    NewEstimateCandidate,

    /// Scenario failed the criteria check; no comparison performed
    NotApplicable,
}

impl ComparisonStatus {
    /// Whether this status flags the scenario for human review
    ///
    /// Drifted and novel estimates need follow-up; matches and failed
    /// scenarios do not.
    #[inline]
    #[must_use]
    pub fn needs_review(self) -> bool {
        matches!(
            self,
            Self::MatchedExistingScenarioNewEstimate | Self::NewEstimateCandidate
        )
    }
}

/// Per-scenario input supplied by the extraction layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// Published article URL identifying the scenario
    pub identity_key: String,

    /// Raw link strings in discovery order; possibly empty or malformed
    pub raw_links: Vec<String>,
}

impl ScenarioInput {
    /// Create scenario input
    #[inline]
    pub fn new(identity_key: impl Into<String>, raw_links: Vec<String>) -> Self {
        Self {
            identity_key: identity_key.into(),
            raw_links,
        }
    }
}

/// Per-scenario outcome handed to the reporting layer
///
/// `estimate_link` carries the *original* usable link text (newline-joined,
/// discovery order); normalized forms are an internal comparison artifact
/// and are exposed separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Published article URL identifying the scenario
    pub identity_key: String,

    /// Usable raw links, newline-joined in discovery order
    pub estimate_link: String,

    /// Category assigned to each raw link, in discovery order
    pub categories: Vec<LinkCategory>,

    /// Whether the scenario passed the criteria check
    pub criteria_passed: bool,

    /// Failure reason; present iff `criteria_passed` is false
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub failure_reason: Option<FailureReason>,

    /// Normalized forms of the usable links; non-empty iff passed
    pub normalized_estimate_links: IndexSet<NormalizedLink>,

    /// Comparison verdict against the reference index
    pub comparison_status: ComparisonStatus,
}

/// One reference inventory record: a known scenario and its canonical
/// estimate link(s)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Published article URL identifying the scenario
    pub identity_key: String,

    /// One or more raw estimate links recorded for the scenario
    pub estimate_links: Vec<String>,
}

impl ReferenceRecord {
    /// Create a reference record
    #[inline]
    pub fn new(identity_key: impl Into<String>, estimate_links: Vec<String>) -> Self {
        Self {
            identity_key: identity_key.into(),
            estimate_links,
        }
    }
}
