use std::path::Path;

use crate::error::{GitError, Result, ResultExt};
use git2::{ErrorCode, Repository as GitRepository};

/// Read-only access to the history of a host repository
pub trait Repository {
    fn open_at(path: &Path) -> Result<Self>
    where
        Self: Sized;
    /// Resolve a symbolic revision (`HEAD`, `HEAD^`, a branch, a sha) to a short commit id
    fn resolve_revision(&self, revision: &str) -> Result<String>;
    /// Read a file's content as it was recorded at the given revision
    fn read_file_at(&self, revision: &str, path: &str) -> Result<Vec<u8>>;
}

pub struct RealGitRepository {
    repo: GitRepository,
}

impl RealGitRepository {
    fn revparse_commit(&self, revision: &str) -> Result<git2::Commit<'_>> {
        let object = self.repo.revparse_single(revision).map_err(|e| match e.code() {
            ErrorCode::NotFound | ErrorCode::InvalidSpec | ErrorCode::Ambiguous => {
                GitError::RevisionNotFound(revision.to_string())
            }
            _ => GitError::Git2Error(e),
        })?;

        object.peel_to_commit().map_err(|e| {
            GitError::RepositoryError(format!(
                "Revision '{}' does not point to a commit: {}",
                revision, e
            ))
        })
    }
}

impl Repository for RealGitRepository {
    fn open_at(path: &Path) -> Result<Self> {
        let repo = GitRepository::discover(path).map_err(|e| {
            GitError::RepositoryError(format!(
                "Failed to discover git repository at '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self { repo })
    }

    fn resolve_revision(&self, revision: &str) -> Result<String> {
        let commit = self.revparse_commit(revision)?;
        let short = commit.as_object().short_id()?;

        short
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| GitError::RepositoryError("Short commit id is not valid UTF-8".to_string()))
    }

    fn read_file_at(&self, revision: &str, path: &str) -> Result<Vec<u8>> {
        let commit = self.revparse_commit(revision)?;
        let tree = commit
            .tree()
            .with_context(|| format!("Failed to read the tree of {revision}"))?;

        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Err(GitError::PathNotFound {
                    revision: revision.to_string(),
                    path: path.to_string(),
                });
            }
            Err(e) => return Err(GitError::Git2Error(e)),
        };

        let blob = entry.to_object(&self.repo)?.peel_to_blob().map_err(|e| {
            GitError::RepositoryError(format!("'{}' is not a file at {}: {}", path, revision, e))
        })?;

        Ok(blob.content().to_vec())
    }
}
