//! Estimate link classification and canonicalization
//!
//! The trusted vocabulary for everything the audit engine knows about a
//! single URL string:
//!
//! - **Classification**: sort a raw link into a [`LinkCategory`]
//! - **Normalization**: canonicalize a usable estimate link into a
//!   [`NormalizedLink`] for identity comparison
//! - **Identity**: canonicalize a published article URL into the scenario
//!   join key
//!
//! Classification is total and infallible: malformed input is a category
//! (`Other`), never an error.
//!
//! # Example
//!
//! ```rust
//! use estaudit_link::{classify, normalize, LinkCategory};
//!
//! let raw = "https://azure.microsoft.com/pricing/calculator/?service=cosmos-db&wt.mc_id=promo";
//! assert_eq!(classify(raw), LinkCategory::ServiceScoped);
//!
//! let normalized = normalize(raw).unwrap();
//! assert_eq!(
//!     normalized.as_str(),
//!     "https://azure.microsoft.com/pricing/calculator?service=cosmos-db"
//! );
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod category;
pub mod identity;
pub mod normalize;

pub use category::{classify, LinkCategory};
pub use identity::canonical_scenario_key;
pub use normalize::{normalize, NormalizeError, NormalizedLink};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
