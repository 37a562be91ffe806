//! Estimate link normalization
//!
//! Canonicalizes a usable estimate link into an identity-preserving normal
//! form. Two usable links refer to the same estimate iff their normalized
//! forms are equal, so formatting noise (tracking parameters, trailing
//! slashes, host casing) must not leak into the result.
//!
//! Normalization is defined only for links [`classify`] marks usable; the
//! caller reports original link text and uses the normalized form purely as
//! a comparison artifact.

use crate::category::{classify, LinkCategory, SERVICE_PARAM, SHARED_ESTIMATE_PARAM};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Canonical string form of a usable estimate link
///
/// Equality and hashing on this type define estimate identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedLink(String);

impl NormalizedLink {
    /// View as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors from [`normalize`]
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// The link is not a usable estimate link
    #[error("not a usable estimate link (classified as {category:?}): {raw}")]
    NotUsable {
        /// Category the classifier assigned
        category: LinkCategory,
        /// The offending input
        raw: String,
    },
}

/// Canonicalize a usable estimate link
///
/// Algorithm:
/// 1. trim surrounding whitespace and parse
/// 2. lower-case scheme and host (path/query stay case-sensitive)
/// 3. strip a single trailing `/` from the path; the rest of the path is
///    kept verbatim (a locale segment is tolerated by classification but
///    stays part of the identity)
/// 4. retain only the identity-defining query parameter
///    (`shared-estimate` for shared/experience links, `service` for
///    service-scoped links), dropping tracking parameters and the fragment
/// 5. reassemble scheme + host + path + retained parameter
///
/// Idempotent: normalizing an already-canonical link returns it unchanged.
///
/// # Errors
/// [`NormalizeError::NotUsable`] when the classifier does not mark the
/// link usable.
pub fn normalize(raw: &str) -> Result<NormalizedLink, NormalizeError> {
    let category = classify(raw);
    if !category.is_usable() {
        return Err(NormalizeError::NotUsable {
            category,
            raw: raw.to_string(),
        });
    }

    // Parse cannot fail here: classify only marks parsable URLs usable.
    let url = Url::parse(raw.trim()).map_err(|_| NormalizeError::NotUsable {
        category: LinkCategory::Other,
        raw: raw.to_string(),
    })?;

    let scheme = url.scheme().to_ascii_lowercase();
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

    let mut path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        path = &path[..path.len() - 1];
    }

    let mut canonical = format!("{scheme}://{host}");
    if let Some(port) = url.port() {
        canonical.push_str(&format!(":{port}"));
    }
    canonical.push_str(path);

    if let Some((key, value)) = identity_param(&url, category) {
        canonical.push('?');
        canonical.push_str(
            &url::form_urlencoded::Serializer::new(String::new())
                .append_pair(key, &value)
                .finish(),
        );
    }

    Ok(NormalizedLink(canonical))
}

/// The single query parameter that defines this link's identity
///
/// `shared-estimate` is preferred when both are present, mirroring the
/// classification ladder. Experience links carry their identity in the
/// path and usually have no parameter at all.
fn identity_param(url: &Url, category: LinkCategory) -> Option<(&'static str, String)> {
    let key = match category {
        LinkCategory::SharedEstimate | LinkCategory::AzureExperience => SHARED_ESTIMATE_PARAM,
        LinkCategory::ServiceScoped => SERVICE_PARAM,
        _ => return None,
    };
    url.query_pairs()
        .find(|(k, v)| k.eq_ignore_ascii_case(key) && !v.trim().is_empty())
        .map(|(_, v)| (key, v.trim().to_string()))
}
