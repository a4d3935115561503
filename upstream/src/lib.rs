//! Upstream - commit history for a dependency's source repository
//!
//! Fetches the commits between two upstream heads from a GitHub-compatible API
//! and drops the ones that carry no changelog information (pull request merges
//! and bare version bumps).

pub mod client;
pub mod error;
pub mod filter;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{split_slug, GithubClient, GithubConfig, HistoryClient};
pub use error::{Result, UpstreamError};
pub use filter::{collect_range, is_noise, is_pull_request_merge, is_version_bump, CommitRange};
pub use types::{ApiCommit, UpstreamCommit};
