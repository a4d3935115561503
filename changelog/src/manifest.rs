//! Reading a dependency's `package.json` as recorded at a host revision

use crate::config::manifest_path;
use crate::error::ChangelogError;
use crate::ports::VersionControl;
use crate::regex_utils::extract_repo_slug;
use crate::types::{CommitId, ManifestSnapshot, Result};
use serde::Deserialize;

/// The parts of an npm manifest the changelog needs
#[derive(Debug, Deserialize)]
struct PackageManifest {
    name: Option<String>,
    repository: Option<RepositoryField>,
    #[serde(rename = "gitHead")]
    git_head: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RepositoryField {
    Shorthand(String),
    Detailed { url: Option<String> },
}

impl RepositoryField {
    fn url(self) -> Option<String> {
        match self {
            Self::Shorthand(url) => Some(url),
            Self::Detailed { url } => url,
        }
    }
}

impl ManifestSnapshot {
    /// `owner/repo` of the declared repository, when it is on a recognized host
    pub fn repo_slug(&self) -> Option<String> {
        self.repository_url.as_deref().and_then(extract_repo_slug)
    }
}

/// Parse manifest bytes into a snapshot of `name`
pub fn parse_manifest(name: &str, content: &[u8]) -> Result<ManifestSnapshot> {
    let manifest: PackageManifest =
        serde_json::from_slice(content).map_err(|source| ChangelogError::InvalidManifest {
            name: name.to_string(),
            source,
        })?;

    Ok(ManifestSnapshot {
        name: manifest.name.unwrap_or_else(|| name.to_string()),
        repository_url: manifest.repository.and_then(RepositoryField::url),
        upstream_head: manifest
            .git_head
            .filter(|head| !head.trim().is_empty())
            .map(CommitId::from),
    })
}

/// Loads manifest snapshots through a `VersionControl`
pub struct ManifestReader<'a, V> {
    vcs: &'a V,
    modules_dir: &'a str,
}

impl<'a, V: VersionControl> ManifestReader<'a, V> {
    pub fn new(vcs: &'a V, modules_dir: &'a str) -> Self {
        Self { vcs, modules_dir }
    }

    /// Snapshot of `name` at `at`; `ChangelogError::NotPresent` if it was not installed then
    pub async fn read(&self, name: &str, at: &CommitId) -> Result<ManifestSnapshot> {
        let path = manifest_path(self.modules_dir, name);

        let content = self.vcs.read_file_at(at, &path).await.map_err(|err| {
            if err.is_path_not_found() {
                ChangelogError::NotPresent {
                    name: name.to_string(),
                    commit: at.to_string(),
                }
            } else {
                ChangelogError::Git(err).with_context(format!("Failed to read {path} at {at}"))
            }
        })?;

        parse_manifest(name, &content)
    }
}
