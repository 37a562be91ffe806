//! Scenario identity keys
//!
//! A scenario is identified by its published article URL. Scan results and
//! the reference inventory both pass their keys through
//! [`canonical_scenario_key`] so that casing, trailing slashes, and query
//! noise never break the join.

use url::Url;

/// Canonicalize a published article URL into the scenario join key
///
/// Lower-cases scheme and host, strips a trailing `/` from the path, and
/// drops query and fragment entirely (article URLs carry no identity in
/// them). Strings that do not parse as URLs are returned trimmed, so
/// odd-but-consistent keys on both sides still join.
#[must_use]
pub fn canonical_scenario_key(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let Ok(url) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };
    let Some(host) = url.host_str() else {
        return trimmed.to_string();
    };

    let mut path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        path = &path[..path.len() - 1];
    }

    let mut key = format!(
        "{}://{}",
        url.scheme().to_ascii_lowercase(),
        host.to_ascii_lowercase()
    );
    if let Some(port) = url.port() {
        key.push_str(&format!(":{port}"));
    }
    key.push_str(path);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_and_case_are_ignored() {
        let a = canonical_scenario_key(
            "https://learn.microsoft.com/en-us/azure/architecture/example-scenario/foo/",
        );
        let b = canonical_scenario_key(
            "HTTPS://Learn.Microsoft.com/en-us/azure/architecture/example-scenario/foo",
        );
        assert_eq!(a, b);
    }

    #[test]
    fn query_and_fragment_are_dropped() {
        let key = canonical_scenario_key(
            "https://learn.microsoft.com/azure/architecture/foo?view=latest#section",
        );
        assert_eq!(key, "https://learn.microsoft.com/azure/architecture/foo");
    }

    #[test]
    fn path_case_is_preserved() {
        let key = canonical_scenario_key("https://learn.microsoft.com/Azure/Architecture/Foo");
        assert_eq!(key, "https://learn.microsoft.com/Azure/Architecture/Foo");
    }

    #[test]
    fn unparsable_key_passes_through_trimmed() {
        assert_eq!(canonical_scenario_key("  some-opaque-key  "), "some-opaque-key");
        assert_eq!(canonical_scenario_key(""), "");
    }
}
