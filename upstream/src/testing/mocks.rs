use crate::client::HistoryClient;
use crate::error::{Result, UpstreamError};
use crate::filter::collect_range;
use crate::types::{ApiCommit, ApiCommitDetails, ApiSignature, UpstreamCommit};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A recorded `fetch_commits` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub repo_slug: String,
    pub from_sha: String,
    pub to_sha: String,
}

/// Mock history client serving canned history pages per repository
#[derive(Clone)]
pub struct MockHistoryClient {
    pub pages: HashMap<String, Vec<ApiCommit>>,
    pub failing: HashMap<String, u16>,
    pub web_base: String,
    calls: Arc<Mutex<Vec<FetchCall>>>,
}

impl MockHistoryClient {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            failing: HashMap::new(),
            web_base: "https://github.com".to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serve `(sha, message)` pairs, newest first, for `repo_slug`
    pub fn with_history(mut self, repo_slug: &str, commits: &[(&str, &str)]) -> Self {
        let page = commits
            .iter()
            .enumerate()
            .map(|(idx, (sha, message))| api_commit(sha, message, idx))
            .collect();
        self.pages.insert(repo_slug.to_string(), page);
        self
    }

    /// Answer requests for `repo_slug` with the given HTTP status
    pub fn with_failure(mut self, repo_slug: &str, status: u16) -> Self {
        self.failing.insert(repo_slug.to_string(), status);
        self
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl Default for MockHistoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryClient for MockHistoryClient {
    async fn fetch_commits(
        &self,
        repo_slug: &str,
        from_sha: &str,
        to_sha: &str,
    ) -> Result<Vec<UpstreamCommit>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(FetchCall {
                repo_slug: repo_slug.to_string(),
                from_sha: from_sha.to_string(),
                to_sha: to_sha.to_string(),
            });
        }

        if let Some(status) = self.failing.get(repo_slug) {
            return Err(UpstreamError::UnexpectedStatus {
                repo: repo_slug.to_string(),
                status: *status,
            });
        }

        let page = self.pages.get(repo_slug).ok_or_else(|| UpstreamError::UnexpectedStatus {
            repo: repo_slug.to_string(),
            status: 404,
        })?;

        Ok(collect_range(page, from_sha, repo_slug, &self.web_base).commits)
    }
}

/// API record with a committer date that decreases with `age`
pub fn api_commit(sha: &str, message: &str, age: usize) -> ApiCommit {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    ApiCommit {
        sha: sha.to_string(),
        commit: ApiCommitDetails {
            message: message.to_string(),
            committer: ApiSignature {
                name: Some("Upstream Dev".to_string()),
                date: base - chrono::Duration::hours(age as i64),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_filters_and_records_calls() {
        let client = MockHistoryClient::new().with_history(
            "acme/foo",
            &[("c3", "Add thing"), ("c2", "1.0.1"), ("c1", "Initial")],
        );

        let commits = client.fetch_commits("acme/foo", "c1", "c3").await.unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].sha, "c3");

        assert_eq!(
            client.calls(),
            vec![FetchCall {
                repo_slug: "acme/foo".to_string(),
                from_sha: "c1".to_string(),
                to_sha: "c3".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let client = MockHistoryClient::new().with_failure("acme/foo", 500);
        let result = client.fetch_commits("acme/foo", "a", "b").await;
        assert!(matches!(result, Err(UpstreamError::UnexpectedStatus { status: 500, .. })));
    }
}
