//! GitHub URL derivation
//!
//! Scenario files and their images live in a public GitHub repository;
//! reports carry browsable blob URLs for the source files and raw
//! download URLs for the images so consumers never have to rebuild them.

/// A GitHub repository slug plus branch, for deriving file URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocator {
    slug: String,
    branch: String,
}

impl RepoLocator {
    /// Create a locator from an `owner/name` slug and a branch name
    #[inline]
    pub fn new(slug: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            branch: branch.into(),
        }
    }

    /// Browsable blob URL for a repo-relative file path
    #[must_use]
    pub fn blob_url(&self, repo_rel_path: &str) -> String {
        format!(
            "https://github.com/{}/blob/{}/{}",
            self.slug,
            self.branch,
            repo_rel_path.trim_start_matches('/')
        )
    }

    /// Raw download URL for a repo-relative file path
    #[must_use]
    pub fn raw_url(&self, repo_rel_path: &str) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}",
            self.slug,
            self.branch,
            repo_rel_path.trim_start_matches('/')
        )
    }
}
