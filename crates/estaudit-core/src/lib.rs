//! Audit Engine Core
//!
//! The decision logic of the estimate-link audit:
//! - Evaluates each scenario's classified links into a pass/fail verdict
//! - Builds the read-only reference index from the inventory
//! - Compares normalized estimate links against the index
//! - Collects the needs-review subset
//!
//! Scenarios are independent of one another; the only cross-scenario state
//! is the [`ReferenceIndex`], built once per run and never mutated
//! afterward. Every operation here is pure, in-memory, and synchronous.
//!
//! # Example
//!
//! ```rust
//! use estaudit_core::{AuditEngine, ReferenceIndex, ReferenceRecord, ScenarioInput};
//!
//! let (index, warnings) = ReferenceIndex::build(vec![ReferenceRecord::new(
//!     "https://learn.microsoft.com/azure/architecture/example",
//!     vec!["https://azure.com/e/abc123".to_string()],
//! )]);
//! assert!(warnings.is_empty());
//!
//! let engine = AuditEngine::new(index);
//! let outcome = engine.audit(&ScenarioInput::new(
//!     "https://learn.microsoft.com/azure/architecture/example",
//!     vec!["https://azure.com/e/abc123?wt.mc_id=x".to_string()],
//! ));
//! assert!(outcome.criteria_passed);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod compare;
pub mod engine;
pub mod evaluate;
pub mod index;
pub mod review;
pub mod types;

// Re-exports for convenience
pub use compare::compare;
pub use engine::AuditEngine;
pub use evaluate::evaluate;
pub use index::{IndexWarning, ReferenceIndex};
pub use review::collect_review_subset;
pub use types::{
    ComparisonStatus, CriteriaVerdict, FailureReason, ReferenceRecord, ScenarioInput,
    ScenarioOutcome,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the audit core
    pub use crate::{
        AuditEngine, ComparisonStatus, CriteriaVerdict, FailureReason, IndexWarning,
        ReferenceIndex, ReferenceRecord, ScenarioInput, ScenarioOutcome,
    };
    pub use estaudit_link::{classify, normalize, LinkCategory, NormalizedLink};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
