//! In-memory capabilities for driving the pipeline in tests

use crate::config::manifest_path;
use crate::error::ChangelogError;
use crate::ports::{DependencyLister, VersionControl};
use crate::types::{CommitId, Result};
use git::GitError;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock version control with fixed revisions and file contents
#[derive(Clone, Default)]
pub struct MockVersionControl {
    pub revisions: HashMap<String, String>,
    pub files: HashMap<(String, String), Vec<u8>>,
    resolutions: Arc<Mutex<Vec<String>>>,
    reads: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockVersionControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_revision(mut self, revision: &str, commit: &str) -> Self {
        self.revisions.insert(revision.to_string(), commit.to_string());
        self
    }

    pub fn with_file(mut self, commit: &str, path: &str, content: &[u8]) -> Self {
        self.files
            .insert((commit.to_string(), path.to_string()), content.to_vec());
        self
    }

    /// Record `node_modules/<name>/package.json` at `commit`
    pub fn with_package(
        self,
        commit: &str,
        name: &str,
        repository_url: Option<&str>,
        git_head: Option<&str>,
    ) -> Self {
        let mut manifest = json!({ "name": name, "version": "1.0.0" });
        if let Some(url) = repository_url {
            manifest["repository"] = json!({ "type": "git", "url": url });
        }
        if let Some(head) = git_head {
            manifest["gitHead"] = json!(head);
        }
        let path = manifest_path("node_modules", name);
        self.with_file(commit, &path, manifest.to_string().as_bytes())
    }

    /// Revisions passed to `resolve_revision`, in call order
    pub fn resolutions(&self) -> Vec<String> {
        self.resolutions.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// `(commit, path)` pairs passed to `read_file_at`, in call order
    pub fn reads(&self) -> Vec<(String, String)> {
        self.reads.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Whether any file of `name` was read
    pub fn was_read(&self, name: &str) -> bool {
        let path = manifest_path("node_modules", name);
        self.reads().iter().any(|(_, read)| *read == path)
    }
}

impl VersionControl for MockVersionControl {
    async fn resolve_revision(&self, revision: &str) -> git::Result<CommitId> {
        if let Ok(mut resolutions) = self.resolutions.lock() {
            resolutions.push(revision.to_string());
        }
        self.revisions
            .get(revision)
            .map(|commit| CommitId::from(commit.as_str()))
            .ok_or_else(|| GitError::RevisionNotFound(revision.to_string()))
    }

    async fn read_file_at(&self, commit: &CommitId, path: &str) -> git::Result<Vec<u8>> {
        if let Ok(mut reads) = self.reads.lock() {
            reads.push((commit.to_string(), path.to_string()));
        }
        self.files
            .get(&(commit.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| GitError::PathNotFound {
                revision: commit.to_string(),
                path: path.to_string(),
            })
    }
}

/// Mock dependency lister
#[derive(Clone, Default)]
pub struct MockDependencyLister {
    pub listed: Vec<String>,
    /// `None` treats every name as installed
    pub installed: Option<Vec<String>>,
    pub failure: Option<String>,
    list_calls: Arc<Mutex<usize>>,
}

impl MockDependencyLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listed(mut self, names: &[&str]) -> Self {
        self.listed = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_installed(mut self, names: &[&str]) -> Self {
        self.installed = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.lock().map(|c| *c).unwrap_or_default()
    }
}

impl DependencyLister for MockDependencyLister {
    async fn list_installed(&self) -> Result<Vec<String>> {
        if let Ok(mut calls) = self.list_calls.lock() {
            *calls += 1;
        }
        match &self.failure {
            Some(message) => Err(ChangelogError::Enumeration(message.clone())),
            None => Ok(self.listed.clone()),
        }
    }

    async fn is_installed(&self, name: &str) -> bool {
        match &self.installed {
            Some(installed) => installed.iter().any(|n| n == name),
            None => true,
        }
    }
}
