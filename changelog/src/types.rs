use crate::error::ChangelogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use upstream::UpstreamCommit;

/// Type alias for Result with `ChangelogError`
pub type Result<T> = std::result::Result<T, ChangelogError>;

/// A stable commit identifier, either in the host project or upstream
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CommitId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CommitId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The two host revisions being compared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundaries {
    pub current: CommitId,
    pub previous: CommitId,
}

/// Recorded state of one dependency at one host revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSnapshot {
    pub name: String,
    pub repository_url: Option<String>,
    pub upstream_head: Option<CommitId>,
}

/// A dependency whose pinned upstream commit moved between the boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyChange {
    pub name: String,
    pub repo_slug: String,
    pub previous_upstream_head: CommitId,
    pub current_upstream_head: CommitId,
}

/// Result of comparing a dependency's snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamChange {
    Changed(DependencyChange),
    Unchanged,
    Unresolvable(SkipReason),
}

/// Why a dependency produced no report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Not in the working tree's install directory
    NotInstalled,
    /// No manifest at one of the boundaries, e.g. newly added
    NotPresent { commit: CommitId },
    /// Repository URL missing or not on a recognized host
    UnrecognizedRepository { url: Option<String> },
    /// One of the snapshots has no pinned upstream commit
    MissingUpstreamHead,
    Unchanged,
    InvalidManifest(String),
    ReadFailed(String),
    FetchFailed(String),
}

impl SkipReason {
    /// Routine outcomes, as opposed to failures worth a warning
    pub fn is_expected(&self) -> bool {
        !matches!(
            self,
            Self::InvalidManifest(_) | Self::ReadFailed(_) | Self::FetchFailed(_)
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInstalled => write!(f, "not installed"),
            Self::NotPresent { commit } => write!(f, "not present at {commit}"),
            Self::UnrecognizedRepository { url: Some(url) } => {
                write!(f, "unrecognized repository URL {url}")
            }
            Self::UnrecognizedRepository { url: None } => write!(f, "no repository URL"),
            Self::MissingUpstreamHead => write!(f, "no pinned upstream commit"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::InvalidManifest(msg) => write!(f, "invalid manifest: {msg}"),
            Self::ReadFailed(msg) => write!(f, "read failed: {msg}"),
            Self::FetchFailed(msg) => write!(f, "history fetch failed: {msg}"),
        }
    }
}

/// Upstream commits for one changed dependency, newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    pub name: String,
    pub current: CommitId,
    pub previous: CommitId,
    pub commits: Vec<UpstreamCommit>,
}

/// Per dependency result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyOutcome {
    Reported(DependencyReport),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedDependency {
    pub name: String,
    pub outcome: DependencyOutcome,
}

/// Everything handed to a renderer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogPayload {
    pub repos: Vec<DependencyReport>,
}

impl ChangelogPayload {
    /// Keep reported dependencies, in evaluation order
    pub fn from_evaluations(evaluations: Vec<EvaluatedDependency>) -> Self {
        let repos = evaluations
            .into_iter()
            .filter_map(|evaluated| match evaluated.outcome {
                DependencyOutcome::Reported(report) => Some(report),
                DependencyOutcome::Skipped(_) => None,
            })
            .collect();
        Self { repos }
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}
