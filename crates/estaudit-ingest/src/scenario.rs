//! Scenario YAML handling
//!
//! Architecture docs publish one YAML file per scenario; its `content`
//! string carries an `[!INCLUDE [](../path/article.md)]` directive pointing
//! at the markdown article with the actual links and images. This module
//! pulls the metadata out of the YAML, finds the include directive, and
//! derives the published learn URL (the scenario identity key) from the
//! docs-relative file path.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Base of published article URLs
pub const LEARN_URL_BASE: &str = "https://learn.microsoft.com/en-us/azure/architecture/";

/// `[!INCLUDE [label](relative/path.md)]` inside the YAML content string
static INCLUDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[!INCLUDE\s*\[[^\]]*\]\s*\(\s*([^)\s]+\.md)\s*\)\s*\]").unwrap()
});

/// Metadata lifted from a scenario YAML file
///
/// Fields come from the nested `metadata` mapping when present, falling
/// back to top-level keys (both layouts are published).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub azure_categories: Vec<String>,
    pub author: Option<String>,
    pub ms_author: Option<String>,
    pub ms_date: Option<String>,
}

/// Extract scenario metadata from a parsed YAML document
#[must_use]
pub fn extract_metadata(doc: &Value) -> ScenarioMetadata {
    let meta = doc.get("metadata").filter(|v| v.is_mapping());
    let get = |key: &str| -> Option<String> {
        meta.and_then(|m| m.get(key))
            .or_else(|| doc.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let azure_categories = doc
        .get("azureCategories")
        .map(|v| match v {
            Value::Sequence(seq) => seq
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Value::String(s) => vec![s.clone()],
            _ => Vec::new(),
        })
        .unwrap_or_default();

    ScenarioMetadata {
        title: get("title"),
        description: get("description"),
        azure_categories,
        author: get("author"),
        ms_author: get("ms.author"),
        ms_date: get("ms.date"),
    }
}

/// Find the first include directive in the YAML `content` string
#[must_use]
pub fn find_include_directive(content: &str) -> Option<String> {
    INCLUDE_RE
        .captures(content)
        .map(|c| c[1].to_string())
}

/// Derive the published learn URL from a docs-relative YAML path
///
/// Strips the `docs/` prefix and the file extension; the remainder is the
/// article route under the architecture center.
#[must_use]
pub fn learn_url_from_docs_path(repo_rel_path: &str) -> String {
    let mut p = repo_rel_path.replace('\\', "/");
    if let Some(rest) = p.strip_prefix("docs/") {
        p = rest.to_string();
    }
    for ext in [".yml", ".yaml"] {
        if p.to_ascii_lowercase().ends_with(ext) {
            p.truncate(p.len() - ext.len());
            break;
        }
    }
    format!("{LEARN_URL_BASE}{p}")
}
