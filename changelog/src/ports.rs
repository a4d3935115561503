//! Capabilities the pipeline consumes, kept behind traits so runs can be driven
//! by real repositories or by in-memory fakes.

use crate::types::{CommitId, Result};
use std::future::Future;

/// Read access to the host project's history
pub trait VersionControl: Send + Sync {
    /// Resolve a symbolic revision to a stable commit id
    fn resolve_revision(
        &self,
        revision: &str,
    ) -> impl Future<Output = git::Result<CommitId>> + Send;

    /// File content at a commit; `GitError::PathNotFound` when absent
    fn read_file_at(
        &self,
        commit: &CommitId,
        path: &str,
    ) -> impl Future<Output = git::Result<Vec<u8>>> + Send;
}

/// Enumeration of the host project's installed dependencies
pub trait DependencyLister: Send + Sync {
    fn list_installed(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Whether the dependency is currently installed in the working tree
    fn is_installed(&self, name: &str) -> impl Future<Output = bool> + Send;
}
