//! Fan-out of the per dependency pipeline and assembly of the payload

use crate::config::ChangelogConfig;
use crate::ports::{DependencyLister, VersionControl};
use crate::resolver::ChangeResolver;
use crate::types::{
    Boundaries, DependencyOutcome, DependencyReport, EvaluatedDependency, SkipReason,
    UpstreamChange,
};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, trace, warn};
use upstream::HistoryClient;

/// Evaluates selected dependencies concurrently, each in its own failure domain
pub struct Aggregator<'a, V, L, H> {
    vcs: &'a V,
    lister: &'a L,
    history: &'a H,
    modules_dir: &'a str,
    max_concurrent: usize,
}

impl<'a, V, L, H> Aggregator<'a, V, L, H>
where
    V: VersionControl,
    L: DependencyLister,
    H: HistoryClient,
{
    pub fn new(vcs: &'a V, lister: &'a L, history: &'a H, config: &'a ChangelogConfig) -> Self {
        Self {
            vcs,
            lister,
            history,
            modules_dir: &config.modules_dir,
            max_concurrent: config.max_concurrent.max(1),
        }
    }

    /// Configure maximum concurrent evaluations
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Outcome for each of the first `limit` names, in selection order.
    ///
    /// Names past `limit` are never looked at. All evaluations run to completion;
    /// `ChangelogPayload::from_evaluations` keeps the reported ones.
    pub async fn aggregate(
        &self,
        names: &[String],
        boundaries: &Boundaries,
        limit: usize,
    ) -> Vec<EvaluatedDependency> {
        let semaphore = Semaphore::new(self.max_concurrent);

        let tasks = names.iter().take(limit).map(|name| {
            let semaphore = &semaphore;
            async move {
                // the semaphore is never closed
                let _permit = semaphore.acquire().await.ok();
                let outcome = self.evaluate_one(name, boundaries).await;
                log_outcome(name, &outcome);
                EvaluatedDependency {
                    name: name.clone(),
                    outcome,
                }
            }
        });

        join_all(tasks).await
    }

    async fn evaluate_one(&self, name: &str, boundaries: &Boundaries) -> DependencyOutcome {
        if !self.lister.is_installed(name).await {
            return DependencyOutcome::Skipped(SkipReason::NotInstalled);
        }

        let resolver = ChangeResolver::new(self.vcs, self.modules_dir);
        let change = match resolver
            .resolve_change(name, &boundaries.current, &boundaries.previous)
            .await
        {
            UpstreamChange::Changed(change) => change,
            UpstreamChange::Unchanged => return DependencyOutcome::Skipped(SkipReason::Unchanged),
            UpstreamChange::Unresolvable(reason) => return DependencyOutcome::Skipped(reason),
        };

        let commits = match self
            .history
            .fetch_commits(
                &change.repo_slug,
                change.previous_upstream_head.as_str(),
                change.current_upstream_head.as_str(),
            )
            .await
        {
            Ok(commits) => commits,
            Err(err) => return DependencyOutcome::Skipped(SkipReason::FetchFailed(err.user_message())),
        };

        DependencyOutcome::Reported(DependencyReport {
            name: name.to_string(),
            current: change.current_upstream_head,
            previous: change.previous_upstream_head,
            commits,
        })
    }
}

fn log_outcome(name: &str, outcome: &DependencyOutcome) {
    match outcome {
        DependencyOutcome::Reported(report) => {
            debug!(dependency = name, commits = report.commits.len(), "dependency changed");
        }
        DependencyOutcome::Skipped(SkipReason::Unchanged) => {
            trace!(dependency = name, "dependency unchanged");
        }
        DependencyOutcome::Skipped(reason) if reason.is_expected() => {
            debug!(dependency = name, %reason, "skipping dependency");
        }
        DependencyOutcome::Skipped(reason) => {
            warn!(dependency = name, %reason, "skipping dependency");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDependencyLister, MockVersionControl};
    use crate::types::{ChangelogPayload, CommitId};
    use upstream::testing::MockHistoryClient;

    fn boundaries() -> Boundaries {
        Boundaries {
            current: CommitId::from("cur"),
            previous: CommitId::from("prev"),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    fn changed_package(vcs: MockVersionControl, name: &str, from: &str, to: &str) -> MockVersionControl {
        let url = format!("https://github.com/acme/{name}.git");
        vcs.with_package("cur", name, Some(url.as_str()), Some(to))
            .with_package("prev", name, Some(url.as_str()), Some(from))
    }

    #[tokio::test]
    async fn test_reports_changed_dependency() {
        let vcs = changed_package(MockVersionControl::new(), "foo", "aaa111", "bbb222");
        let history = MockHistoryClient::new().with_history(
            "acme/foo",
            &[("bbb222", "Second"), ("abc123", "First"), ("aaa111", "Old")],
        );
        let lister = MockDependencyLister::new();
        let config = ChangelogConfig::default();

        let payload = ChangelogPayload::from_evaluations(
            Aggregator::new(&vcs, &lister, &history, &config)
                .aggregate(&names(&["foo"]), &boundaries(), 10)
                .await,
        );

        assert_eq!(payload.repos.len(), 1);
        let report = &payload.repos[0];
        assert_eq!(report.name, "foo");
        assert_eq!(report.current, CommitId::from("bbb222"));
        assert_eq!(report.previous, CommitId::from("aaa111"));
        let shas: Vec<_> = report.commits.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, vec!["bbb222", "abc123"]);
    }

    #[tokio::test]
    async fn test_limit_truncates_before_lookup() {
        let mut vcs = MockVersionControl::new();
        for name in ["one", "two", "three"] {
            vcs = changed_package(vcs, name, "a1", "b2");
        }
        let history = MockHistoryClient::new()
            .with_history("acme/one", &[("b2", "x"), ("a1", "y")])
            .with_history("acme/two", &[("b2", "x"), ("a1", "y")])
            .with_history("acme/three", &[("b2", "x"), ("a1", "y")]);
        let lister = MockDependencyLister::new();
        let config = ChangelogConfig::default();

        let payload = ChangelogPayload::from_evaluations(
            Aggregator::new(&vcs, &lister, &history, &config)
                .aggregate(&names(&["one", "two", "three"]), &boundaries(), 2)
                .await,
        );

        let reported: Vec<_> = payload.repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(reported, vec!["one", "two"]);
        assert!(!vcs.was_read("three"));
        assert!(history.calls().iter().all(|call| call.repo_slug != "acme/three"));
    }

    #[tokio::test]
    async fn test_failures_do_not_affect_siblings() {
        let vcs = changed_package(MockVersionControl::new(), "broken", "a1", "b2");
        let vcs = changed_package(vcs, "good", "a1", "b2");
        let vcs = vcs
            .with_package("cur", "fresh", Some("https://github.com/acme/fresh.git"), Some("b2"))
            .with_package("cur", "same", Some("https://github.com/acme/same.git"), Some("a1"))
            .with_package("prev", "same", Some("https://github.com/acme/same.git"), Some("a1"))
            .with_package("cur", "private", Some("https://git.example.com/x/private.git"), Some("b2"))
            .with_package("prev", "private", Some("https://git.example.com/x/private.git"), Some("a1"));
        let history = MockHistoryClient::new()
            .with_failure("acme/broken", 500)
            .with_history("acme/good", &[("b2", "Good change"), ("a1", "Old")]);
        let lister = MockDependencyLister::new();
        let config = ChangelogConfig::default();

        let aggregator = Aggregator::new(&vcs, &lister, &history, &config);
        let evaluations = aggregator
            .aggregate(
                &names(&["broken", "fresh", "good", "same", "private"]),
                &boundaries(),
                10,
            )
            .await;

        let outcomes: Vec<_> = evaluations.iter().map(|e| (e.name.as_str(), &e.outcome)).collect();
        assert!(matches!(outcomes[0], ("broken", DependencyOutcome::Skipped(SkipReason::FetchFailed(_)))));
        assert!(matches!(
            outcomes[1],
            ("fresh", DependencyOutcome::Skipped(SkipReason::NotPresent { .. }))
        ));
        assert!(matches!(outcomes[2], ("good", DependencyOutcome::Reported(_))));
        assert!(matches!(outcomes[3], ("same", DependencyOutcome::Skipped(SkipReason::Unchanged))));
        assert!(matches!(
            outcomes[4],
            ("private", DependencyOutcome::Skipped(SkipReason::UnrecognizedRepository { .. }))
        ));

        let payload = ChangelogPayload::from_evaluations(evaluations);
        assert_eq!(payload.repos.len(), 1);
        assert_eq!(payload.repos[0].name, "good");
    }

    #[tokio::test]
    async fn test_not_installed_is_skipped_without_reads() {
        let vcs = changed_package(MockVersionControl::new(), "gone", "a1", "b2");
        let history = MockHistoryClient::new();
        let lister = MockDependencyLister::new().with_installed(&[]);
        let config = ChangelogConfig::default();

        let evaluations = Aggregator::new(&vcs, &lister, &history, &config)
            .aggregate(&names(&["gone"]), &boundaries(), 10)
            .await;

        assert_eq!(
            evaluations[0].outcome,
            DependencyOutcome::Skipped(SkipReason::NotInstalled)
        );
        assert!(vcs.reads().is_empty());
    }

    #[tokio::test]
    async fn test_order_is_kept_with_single_permit() {
        let mut vcs = MockVersionControl::new();
        let mut history = MockHistoryClient::new();
        let list = ["c", "a", "b"];
        for name in list {
            vcs = changed_package(vcs, name, "a1", "b2");
            history = history.with_history(&format!("acme/{name}"), &[("b2", "x"), ("a1", "y")]);
        }
        let lister = MockDependencyLister::new();
        let config = ChangelogConfig::default();

        let payload = ChangelogPayload::from_evaluations(
            Aggregator::new(&vcs, &lister, &history, &config)
                .with_max_concurrent(1)
                .aggregate(&names(&list), &boundaries(), 10)
                .await,
        );

        let reported: Vec<_> = payload.repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(reported, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_zero_limit_evaluates_nothing() {
        let vcs = MockVersionControl::new();
        let history = MockHistoryClient::new();
        let lister = MockDependencyLister::new();
        let config = ChangelogConfig::default();

        let payload = ChangelogPayload::from_evaluations(
            Aggregator::new(&vcs, &lister, &history, &config)
                .aggregate(&names(&["foo"]), &boundaries(), 0)
                .await,
        );

        assert!(payload.is_empty());
        assert!(vcs.reads().is_empty());
    }
}
