use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a dependency changelog
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to resolve revision '{revision}': {source}")]
    Resolution {
        revision: String,
        #[source]
        source: git::GitError,
    },

    #[error("{name} is not present at revision {commit}")]
    NotPresent { name: String, commit: String },

    #[error("Invalid manifest for {name}: {source}")]
    InvalidManifest {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Git operation failed: {0}")]
    Git(#[from] git::GitError),

    #[error("Failed to read allow-list {path}: {source}")]
    AllowList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to enumerate installed dependencies: {0}")]
    Enumeration(String),

    #[error("Failed to serialize changelog: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}: {1}")]
    WithContext(String, Box<ChangelogError>),
}

impl ChangelogError {
    #[must_use]
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    /// Revision resolution failures abort a run; everything else is per dependency
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Resolution { .. } => true,
            Self::WithContext(_, inner) => inner.is_fatal(),
            _ => false,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Resolution { revision, source } => {
                format!("Cannot resolve revision '{revision}': {}", source.user_message())
            }
            Self::NotPresent { name, commit } => format!("{name} does not exist at {commit}"),
            Self::InvalidManifest { name, source } => {
                format!("package.json of {name} could not be parsed: {source}")
            }
            Self::Git(err) => err.user_message(),
            Self::AllowList { path, source } => {
                format!("Could not read {}: {source}", path.display())
            }
            Self::Enumeration(msg) => format!("Could not list installed dependencies: {msg}"),
            Self::Serialize(err) => format!("Failed to produce JSON: {err}"),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_resolution_is_fatal() {
        let fatal = ChangelogError::Resolution {
            revision: "HEAD~99".to_string(),
            source: git::GitError::RevisionNotFound("HEAD~99".to_string()),
        };
        assert!(fatal.is_fatal());
        assert!(fatal.with_context("Boundary").is_fatal());

        let skip = ChangelogError::NotPresent {
            name: "foo".to_string(),
            commit: "abc1234".to_string(),
        };
        assert!(!skip.is_fatal());
    }

    #[test]
    fn test_user_message() {
        let err = ChangelogError::Resolution {
            revision: "HEAD~99".to_string(),
            source: git::GitError::RevisionNotFound("HEAD~99".to_string()),
        };
        assert_eq!(
            err.user_message(),
            "Cannot resolve revision 'HEAD~99': Revision 'HEAD~99' does not exist"
        );
    }
}
