//! Commit-message heuristics and range extraction over a fetched history page

use crate::types::{ApiCommit, UpstreamCommit};
use once_cell::sync::Lazy;
use regex::Regex;

const MERGE_PULL_REQUEST_PREFIX: &str = "Merge pull request #";

static VERSION_BUMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("version bump pattern is valid"));

/// Pull request merge commits; the merged commits appear on their own in the history
pub fn is_pull_request_merge(message: &str) -> bool {
    message.starts_with(MERGE_PULL_REQUEST_PREFIX)
}

/// Commits whose whole message is a bare `major.minor.patch` (e.g. from `npm version`)
pub fn is_version_bump(message: &str) -> bool {
    VERSION_BUMP.is_match(message)
}

/// Whether a commit carries no changelog information of its own
pub fn is_noise(message: &str) -> bool {
    is_pull_request_merge(message) || is_version_bump(message)
}

/// Outcome of walking one page of history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    pub commits: Vec<UpstreamCommit>,
    /// Whether the walk stopped at the range start; `false` means the page ran out first
    pub reached_start: bool,
}

/// Walk `history` newest to oldest, keeping commits until `from_sha` is met.
///
/// `from_sha` and everything older is excluded. Noise commits are dropped.
pub fn collect_range(
    history: &[ApiCommit],
    from_sha: &str,
    repo_slug: &str,
    web_base: &str,
) -> CommitRange {
    let mut commits = Vec::new();

    for entry in history {
        if shas_match(&entry.sha, from_sha) {
            return CommitRange {
                commits,
                reached_start: true,
            };
        }
        if is_noise(&entry.commit.message) {
            continue;
        }
        commits.push(UpstreamCommit::from_api(entry, repo_slug, web_base));
    }

    CommitRange {
        commits,
        reached_start: false,
    }
}

// the pinned head may be abbreviated while the API always reports full shas
fn shas_match(full: &str, pinned: &str) -> bool {
    !pinned.is_empty() && (full == pinned || (pinned.len() >= 7 && full.starts_with(pinned)))
}
