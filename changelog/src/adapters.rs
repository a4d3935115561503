//! Capabilities backed by a real git repository and the npm CLI

use crate::config::ChangelogConfig;
use crate::error::ChangelogError;
use crate::ports::{DependencyLister, VersionControl};
use crate::regex_utils::parse_npm_ls;
use crate::types::{CommitId, Result};
use git::{GitError, RealGitRepository, Repository};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// `VersionControl` over a git repository at an explicit path
#[derive(Debug, Clone)]
pub struct GitVersionControl {
    repo_path: PathBuf,
}

impl GitVersionControl {
    pub fn new<P: Into<PathBuf>>(repo_path: P) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }
}

// git2 handles are not shareable across threads, so every call opens its own
async fn with_repository<T, F>(repo_path: &Path, op: F) -> git::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&RealGitRepository) -> git::Result<T> + Send + 'static,
{
    let repo_path = repo_path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let repo = RealGitRepository::open_at(&repo_path)?;
        op(&repo)
    })
    .await
    .map_err(|e| GitError::RepositoryError(format!("git task failed: {e}")))?
}

impl VersionControl for GitVersionControl {
    async fn resolve_revision(&self, revision: &str) -> git::Result<CommitId> {
        let revision = revision.to_string();
        with_repository(&self.repo_path, move |repo| {
            repo.resolve_revision(&revision).map(CommitId::from)
        })
        .await
    }

    async fn read_file_at(&self, commit: &CommitId, path: &str) -> git::Result<Vec<u8>> {
        let commit = commit.to_string();
        let path = path.to_string();
        with_repository(&self.repo_path, move |repo| repo.read_file_at(&commit, &path)).await
    }
}

/// `DependencyLister` using `npm ls` and the install directory of the working tree
#[derive(Debug, Clone)]
pub struct NpmLister {
    config: ChangelogConfig,
}

impl NpmLister {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(project_dir: P, modules_dir: S) -> Self {
        Self {
            config: ChangelogConfig::new(project_dir).with_modules_dir(modules_dir),
        }
    }

    pub fn from_config(config: &ChangelogConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl DependencyLister for NpmLister {
    async fn list_installed(&self) -> Result<Vec<String>> {
        let output = Command::new("npm")
            .arg("ls")
            .current_dir(&self.config.project_dir)
            .output()
            .await
            .map_err(|e| ChangelogError::Enumeration(format!("failed to run npm ls: {e}")))?;

        // npm ls exits non-zero on extraneous or missing packages but still prints the tree
        if !output.status.success() {
            debug!(status = ?output.status.code(), "npm ls reported problems");
        }

        Ok(parse_npm_ls(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn is_installed(&self, name: &str) -> bool {
        tokio::fs::try_exists(self.config.installed_manifest(name))
            .await
            .unwrap_or(false)
    }
}
