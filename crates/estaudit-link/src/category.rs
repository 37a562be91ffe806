//! Link classification
//!
//! Sorts a raw URL string into exactly one [`LinkCategory`] using a fixed
//! priority ladder. Classification is a pure function of the string and
//! never fails: anything unparsable is [`LinkCategory::Other`].

use serde::{Deserialize, Serialize};
use url::Url;

/// Host carrying short-form pricing-experience links (`azure.com/e/<token>`)
pub const EXPERIENCE_HOST: &str = "azure.com";

/// Path prefix of pricing-experience links
pub const EXPERIENCE_PREFIX: &str = "/e/";

/// Host of the pricing calculator tool
pub const CALCULATOR_HOST: &str = "azure.microsoft.com";

/// Path of the pricing calculator tool (without locale segment)
pub const CALCULATOR_PATH: &str = "/pricing/calculator";

/// Query parameter identifying a saved shared estimate
pub const SHARED_ESTIMATE_PARAM: &str = "shared-estimate";

/// Query parameter identifying a service-scoped estimate
pub const SERVICE_PARAM: &str = "service";

/// Category assigned to a single raw link
///
/// The first three variants are *usable* estimate links: specific enough to
/// identify a saved or parameterized estimate. `CalculatorToolRoot` is a
/// bare link to the tool itself; `Other` is everything else, including
/// strings that do not parse as URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkCategory {
    /// Short-form `azure.com/e/<token>` pricing-experience link
    AzureExperience,

    /// Calculator link with a non-empty `shared-estimate` parameter
    SharedEstimate,

    /// Calculator link with a non-empty `service` parameter
    ServiceScoped,

    /// Calculator link with neither identity parameter
    CalculatorToolRoot,

    /// Anything else, including malformed URLs
    Other,
}

impl LinkCategory {
    /// Whether this category counts as a usable estimate link
    #[inline]
    #[must_use]
    pub fn is_usable(self) -> bool {
        matches!(
            self,
            Self::AzureExperience | Self::SharedEstimate | Self::ServiceScoped
        )
    }

    /// Whether this link points at the calculator domain at all
    #[inline]
    #[must_use]
    pub fn is_calculator_domain(self) -> bool {
        self != Self::Other
    }
}

/// Classify a raw link string
///
/// Rules are evaluated in priority order; first match wins:
/// 1. experience host + `/e/` prefix → [`LinkCategory::AzureExperience`]
/// 2. calculator host/path + non-empty `shared-estimate` →
///    [`LinkCategory::SharedEstimate`]
/// 3. calculator host/path + non-empty `service` →
///    [`LinkCategory::ServiceScoped`]
/// 4. calculator host/path, neither parameter →
///    [`LinkCategory::CalculatorToolRoot`]
/// 5. everything else → [`LinkCategory::Other`]
///
/// The ladder resolves pattern overlap deterministically: a URL carrying
/// both identity parameters classifies as a shared estimate.
#[must_use]
pub fn classify(raw: &str) -> LinkCategory {
    let Ok(url) = Url::parse(raw.trim()) else {
        return LinkCategory::Other;
    };

    if !matches!(url.scheme(), "http" | "https") {
        return LinkCategory::Other;
    }

    let Some(host) = url.host_str() else {
        return LinkCategory::Other;
    };

    if host.eq_ignore_ascii_case(EXPERIENCE_HOST) && is_experience_path(url.path()) {
        return LinkCategory::AzureExperience;
    }

    if !is_calculator_host(host) || !is_calculator_path(url.path()) {
        return LinkCategory::Other;
    }

    if has_nonempty_param(&url, SHARED_ESTIMATE_PARAM) {
        LinkCategory::SharedEstimate
    } else if has_nonempty_param(&url, SERVICE_PARAM) {
        LinkCategory::ServiceScoped
    } else {
        LinkCategory::CalculatorToolRoot
    }
}

/// Experience paths must carry a non-empty token after the `/e/` prefix
fn is_experience_path(path: &str) -> bool {
    path.strip_prefix(EXPERIENCE_PREFIX)
        .is_some_and(|rest| !rest.trim_end_matches('/').is_empty())
}

fn is_calculator_host(host: &str) -> bool {
    host.eq_ignore_ascii_case(CALCULATOR_HOST)
        || host
            .strip_prefix("www.")
            .is_some_and(|h| h.eq_ignore_ascii_case(CALCULATOR_HOST))
}

/// Calculator path, tolerating one leading `ll-cc` locale segment and a
/// trailing slash (`/en-us/pricing/calculator/` is published alongside the
/// locale-free form)
pub(crate) fn is_calculator_path(path: &str) -> bool {
    let path = strip_locale_segment(path);
    path == CALCULATOR_PATH || path == format!("{CALCULATOR_PATH}/")
}

/// Drop a single leading locale segment (`/en-us`, `/ja-jp`, ...) if present
pub(crate) fn strip_locale_segment(path: &str) -> &str {
    let Some(rest) = path.strip_prefix('/') else {
        return path;
    };
    let Some((first, _)) = rest.split_once('/') else {
        return path;
    };
    if is_locale_segment(first) {
        &path[first.len() + 1..]
    } else {
        path
    }
}

fn is_locale_segment(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 5
        && bytes[2] == b'-'
        && bytes[..2].iter().all(u8::is_ascii_alphabetic)
        && bytes[3..].iter().all(u8::is_ascii_alphabetic)
}

/// Case-insensitive lookup of a non-empty query parameter value
pub(crate) fn has_nonempty_param(url: &Url, key: &str) -> bool {
    url.query_pairs()
        .any(|(k, v)| k.eq_ignore_ascii_case(key) && !v.trim().is_empty())
}
