//! Wire models for the remote history API and the filtered commit records built from them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the remote `commits` listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCommit {
    /// The SHA of the commit.
    pub sha: String,

    /// The commit details.
    pub commit: ApiCommitDetails,
}

/// The message and committer for a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCommitDetails {
    pub message: String,
    pub committer: ApiSignature,
}

/// Committer identity and date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSignature {
    #[serde(default)]
    pub name: Option<String>,
    pub date: DateTime<Utc>,
}

/// A commit kept in a dependency's changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamCommit {
    pub sha: String,
    pub message: String,
    /// First line of `message`
    pub message_summary: String,
    pub date: DateTime<Utc>,
    pub url: String,
}

impl UpstreamCommit {
    /// Build a changelog commit from an API record, linking it under `web_base`
    pub fn from_api(api: &ApiCommit, repo_slug: &str, web_base: &str) -> Self {
        let message = api.commit.message.clone();
        Self {
            sha: api.sha.clone(),
            message_summary: message_summary(&message).to_string(),
            message,
            date: api.commit.committer.date,
            url: format!(
                "{}/{}/commit/{}",
                web_base.trim_end_matches('/'),
                repo_slug,
                api.sha
            ),
        }
    }

    /// Abbreviated sha for display
    pub fn short_sha(&self) -> &str {
        let end = self
            .sha
            .char_indices()
            .nth(7)
            .map_or(self.sha.len(), |(idx, _)| idx);
        &self.sha[..end]
    }
}

/// The first line of a commit message
pub fn message_summary(message: &str) -> &str {
    message.split('\n').next().unwrap_or_default().trim_end_matches('\r')
}
