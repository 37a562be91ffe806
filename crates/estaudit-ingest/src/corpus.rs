//! Corpus scanning
//!
//! Walks a docs root for scenario YAML files and assembles one
//! [`ScenarioRecord`] per file: identity key, metadata, the raw link and
//! image candidates from the included article, or the extraction failure
//! that stopped short of them.

use crate::article::{extract_estimate_link_candidates, extract_image_refs, split_frontmatter};
use crate::error::IngestError;
use crate::github::RepoLocator;
use crate::scenario::{extract_metadata, find_include_directive, learn_url_from_docs_path, ScenarioMetadata};
use estaudit_core::ScenarioInput;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Why extraction stopped before the audit core could run
///
/// These are per-file outcomes, reported alongside the scenario row; they
/// never abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionFailure {
    /// YAML did not parse into a mapping
    YamlParseFailed,

    /// YAML has no `content` string to search for the include directive
    MissingContentString,

    /// `content` carries no `[!INCLUDE]` directive
    NoIncludeDirective,

    /// The include reference does not resolve inside the repository
    IncludeMdUnresolvable,

    /// The resolved article file does not exist
    IncludeMdMissing,

    /// The article carries no usable image reference
    NoImagesFound,
}

/// One image referenced by a scenario article
///
/// `repo_path` is the resolved repo-relative path when the reference
/// resolves inside the repository, otherwise the cleaned reference text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// The reference as written in the article
    pub reference: String,

    /// Repo-relative path (or cleaned fallback for external references)
    pub repo_path: String,

    /// Raw download URL, when a repository locator was supplied
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub download_url: Option<String>,

    /// Whether the file exists in the local working tree
    pub exists_in_repo: bool,

    /// Lowercased file extension, empty when the reference has none
    pub format: String,
}

/// One scenario file's extraction result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Published article URL (scenario identity key)
    pub identity_key: String,

    /// Repo-relative path of the scenario YAML file
    pub yml_path: String,

    /// Blob URL of the YAML file, when a repository locator was supplied
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub yml_github_url: Option<String>,

    /// Repo-relative path of the included article, once resolved
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub include_md_path: Option<String>,

    /// Blob URL of the resolved article
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub include_md_github_url: Option<String>,

    /// Metadata lifted from the YAML (authors may be overridden by the
    /// article frontmatter)
    pub metadata: ScenarioMetadata,

    /// Raw estimate-link candidates in discovery order
    pub raw_links: Vec<String>,

    /// Referenced images in discovery order
    #[serde(default)]
    pub images: Vec<ImageAsset>,

    /// Set when extraction stopped before link/image candidates were usable
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub extraction_failure: Option<ExtractionFailure>,
}

impl ScenarioRecord {
    /// Whether the record extracted cleanly and can be audited
    #[inline]
    #[must_use]
    pub fn extracted(&self) -> bool {
        self.extraction_failure.is_none()
    }

    /// Convert into audit-core input
    #[must_use]
    pub fn to_input(&self) -> ScenarioInput {
        ScenarioInput::new(self.identity_key.clone(), self.raw_links.clone())
    }
}

/// Walks a repository's docs root and extracts scenario records
#[derive(Debug)]
pub struct CorpusScanner {
    repo_root: PathBuf,
    docs_root: String,
    github: Option<RepoLocator>,
}

impl CorpusScanner {
    /// Create a scanner for `docs_root` under `repo_root`
    #[inline]
    pub fn new(repo_root: impl Into<PathBuf>, docs_root: impl Into<String>) -> Self {
        Self {
            repo_root: repo_root.into(),
            docs_root: docs_root.into(),
            github: None,
        }
    }

    /// Derive GitHub blob and raw download URLs for scanned files
    #[must_use]
    pub fn with_github(mut self, github: RepoLocator) -> Self {
        self.github = Some(github);
        self
    }

    /// Scan the corpus
    ///
    /// Files are visited in sorted path order so results are deterministic.
    ///
    /// # Errors
    /// [`IngestError::DocsRootNotFound`] when the docs root is absent;
    /// [`IngestError::Io`] when a discovered file cannot be read.
    pub fn scan(&self) -> Result<Vec<ScenarioRecord>, IngestError> {
        let docs_path = self.repo_root.join(&self.docs_root);
        if !docs_path.is_dir() {
            return Err(IngestError::DocsRootNotFound(docs_path));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&docs_path)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("yml") || e.eq_ignore_ascii_case("yaml"))
            })
            .collect();
        files.sort();

        tracing::info!(files = files.len(), docs_root = %self.docs_root, "scanning corpus");

        files.iter().map(|f| self.scan_file(f)).collect()
    }

    /// Extract a single scenario file
    fn scan_file(&self, yml_path: &Path) -> Result<ScenarioRecord, IngestError> {
        let repo_rel = repo_relative(&self.repo_root, yml_path);
        let mut record = ScenarioRecord {
            identity_key: learn_url_from_docs_path(&repo_rel),
            yml_github_url: self.github.as_ref().map(|g| g.blob_url(&repo_rel)),
            yml_path: repo_rel,
            include_md_path: None,
            include_md_github_url: None,
            metadata: ScenarioMetadata::default(),
            raw_links: Vec::new(),
            images: Vec::new(),
            extraction_failure: None,
        };

        let text = read_lossy(yml_path)?;
        let Ok(doc) = serde_yaml::from_str::<Value>(&text) else {
            record.extraction_failure = Some(ExtractionFailure::YamlParseFailed);
            return Ok(record);
        };
        if !doc.is_mapping() {
            record.extraction_failure = Some(ExtractionFailure::YamlParseFailed);
            return Ok(record);
        }

        record.metadata = extract_metadata(&doc);

        let Some(content) = doc.get("content").and_then(Value::as_str) else {
            record.extraction_failure = Some(ExtractionFailure::MissingContentString);
            return Ok(record);
        };

        let Some(include_ref) = find_include_directive(content) else {
            record.extraction_failure = Some(ExtractionFailure::NoIncludeDirective);
            return Ok(record);
        };

        let base_dir = yml_path.parent().unwrap_or(&self.repo_root);
        let Some(include_rel) = resolve_repo_relative(base_dir, &include_ref, &self.repo_root)
        else {
            record.include_md_path = Some(include_ref);
            record.extraction_failure = Some(ExtractionFailure::IncludeMdUnresolvable);
            return Ok(record);
        };

        let md_file = self.repo_root.join(&include_rel);
        record.include_md_github_url = self.github.as_ref().map(|g| g.blob_url(&include_rel));
        record.include_md_path = Some(include_rel);
        if !md_file.is_file() {
            record.extraction_failure = Some(ExtractionFailure::IncludeMdMissing);
            return Ok(record);
        }

        let md_text = read_lossy(&md_file)?;

        // Frontmatter authors take precedence over the YAML's
        let (frontmatter, _) = split_frontmatter(&md_text);
        if let Some(fm) = frontmatter {
            if let Some(author) = fm.get("author").and_then(Value::as_str) {
                record.metadata.author = Some(author.to_string());
            }
            if let Some(ms_author) = fm.get("ms.author").and_then(Value::as_str) {
                record.metadata.ms_author = Some(ms_author.to_string());
            }
        }

        record.raw_links = extract_estimate_link_candidates(&md_text);
        let md_dir = md_file.parent().unwrap_or(&self.repo_root);
        record.images = extract_image_refs(&md_text)
            .into_iter()
            .map(|r| self.image_asset(md_dir, r))
            .collect();

        if record.images.is_empty() {
            record.extraction_failure = Some(ExtractionFailure::NoImagesFound);
        }

        debug!(
            yml_path = %record.yml_path,
            links = record.raw_links.len(),
            images = record.images.len(),
            failure = ?record.extraction_failure,
            "extracted scenario"
        );

        Ok(record)
    }

    /// Resolve one image reference into its report columns
    fn image_asset(&self, base_dir: &Path, reference: String) -> ImageAsset {
        let repo_path = resolve_repo_relative(base_dir, &reference, &self.repo_root)
            .unwrap_or_else(|| {
                reference
                    .split(['?', '#'])
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches('/')
                    .to_string()
            });
        let exists_in_repo = self.repo_root.join(&repo_path).is_file();
        let download_url = self.github.as_ref().map(|g| g.raw_url(&repo_path));
        let format = Path::new(&repo_path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        ImageAsset {
            reference,
            repo_path,
            download_url,
            exists_in_repo,
            format,
        }
    }
}

/// Forward-slash repo-relative path
fn repo_relative(repo_root: &Path, path: &Path) -> String {
    path.strip_prefix(repo_root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolve a relative include reference against `base_dir`, staying inside
/// `repo_root`
///
/// External URLs and references escaping the repository resolve to `None`.
fn resolve_repo_relative(base_dir: &Path, reference: &str, repo_root: &Path) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() || reference.contains("://") {
        return None;
    }

    // Drop query/fragment noise
    let reference = reference
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_start_matches("./");

    // Logical normalization, no filesystem access
    let joined = if let Some(rooted) = reference.strip_prefix('/') {
        repo_root.join(rooted)
    } else {
        base_dir.join(reference)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::CurDir => {}
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
        .strip_prefix(repo_root)
        .ok()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .filter(|p| !p.is_empty())
}

fn read_lossy(path: &Path) -> Result<String, IngestError> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::io_error(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
