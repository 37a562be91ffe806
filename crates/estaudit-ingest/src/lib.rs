//! Extraction layer
//!
//! The boundary between the filesystem and the audit core:
//!
//! - **Corpus**: walk a docs root, assemble one [`ScenarioRecord`] per
//!   scenario YAML file
//! - **Scenario**: YAML metadata, include-directive resolution, learn-URL
//!   derivation
//! - **Article**: estimate-link and image-reference extraction from the
//!   included markdown article
//! - **Inventory**: load the reference inventory for index construction
//! - **GitHub**: derive blob/raw URLs for scanned files and images
//!
//! Per-file problems (unparsable YAML, missing includes, no images) are
//! recorded as [`ExtractionFailure`] outcomes on the record, never raised
//! as errors; [`IngestError`] is reserved for conditions that abort the
//! run, such as an unreadable docs root or inventory file.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod article;
pub mod corpus;
pub mod error;
pub mod github;
pub mod inventory;
pub mod scenario;

// Re-exports for convenience
pub use corpus::{CorpusScanner, ExtractionFailure, ImageAsset, ScenarioRecord};
pub use error::IngestError;
pub use github::RepoLocator;
pub use inventory::{load_inventory, split_estimate_links};
pub use scenario::{learn_url_from_docs_path, ScenarioMetadata};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
