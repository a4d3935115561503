//! Changelog of upstream commits for dependencies whose pinned upstream
//! commit moved between two revisions of a host repository.
//!
//! The pipeline runs in order:
//! 1. resolve the two boundary revisions ([`revision`])
//! 2. choose which dependencies to look at ([`selector`])
//! 3. for the first `limit` of them, compare the recorded manifests and
//!    fetch the upstream commits in between ([`aggregator`])
//!
//! Only a failed boundary resolution aborts a run. Anything going wrong for
//! a single dependency drops that dependency from the payload.

pub mod adapters;
pub mod aggregator;
pub mod config;
pub mod error;
pub mod formatter;
pub mod manifest;
pub mod ports;
pub mod regex_utils;
pub mod resolver;
pub mod revision;
pub mod selector;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;

pub use adapters::{GitVersionControl, NpmLister};
pub use aggregator::Aggregator;
pub use config::ChangelogConfig;
pub use error::ChangelogError;
pub use formatter::{render, HtmlRenderer, JsonRenderer, OutputFormat, OutputRenderer, WikitextRenderer};
pub use ports::{DependencyLister, VersionControl};
pub use types::{
    Boundaries, ChangelogPayload, CommitId, DependencyOutcome, DependencyReport,
    EvaluatedDependency, ManifestSnapshot, Result, SkipReason,
};

use tracing::{info, warn};
use upstream::HistoryClient;

/// Everything a run found out, before it is reduced to a payload
#[derive(Debug)]
pub struct ChangelogRun {
    pub boundaries: Boundaries,
    pub selected: Vec<String>,
    pub evaluations: Vec<EvaluatedDependency>,
}

impl ChangelogRun {
    /// Number of dependencies that were looked at
    pub fn evaluated(&self) -> usize {
        self.evaluations.len()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.evaluations.iter().filter_map(|e| match &e.outcome {
            DependencyOutcome::Skipped(reason) => Some((e.name.as_str(), reason)),
            DependencyOutcome::Reported(_) => None,
        })
    }

    pub fn into_payload(self) -> ChangelogPayload {
        ChangelogPayload::from_evaluations(self.evaluations)
    }
}

/// Run the whole pipeline and keep every per dependency outcome
pub async fn run_changelog<V, L, H>(
    config: &ChangelogConfig,
    vcs: &V,
    lister: &L,
    history: &H,
) -> Result<ChangelogRun>
where
    V: VersionControl,
    L: DependencyLister,
    H: HistoryClient,
{
    let boundaries =
        revision::resolve_boundaries(vcs, &config.current_rev, &config.previous_rev).await?;

    let selected = match selector::select(config, lister).await {
        Ok(names) => names,
        Err(err) => {
            warn!(error = %err, "could not select dependencies, continuing with none");
            Vec::new()
        }
    };

    let evaluations = Aggregator::new(vcs, lister, history, config)
        .aggregate(&selected, &boundaries, config.limit)
        .await;

    info!(
        selected = selected.len(),
        evaluated = evaluations.len(),
        "changelog run finished"
    );

    Ok(ChangelogRun {
        boundaries,
        selected,
        evaluations,
    })
}

/// Changelog payload between `config.previous_rev` and `config.current_rev`
pub async fn generate_changelog<V, L, H>(
    config: &ChangelogConfig,
    vcs: &V,
    lister: &L,
    history: &H,
) -> Result<ChangelogPayload>
where
    V: VersionControl,
    L: DependencyLister,
    H: HistoryClient,
{
    Ok(run_changelog(config, vcs, lister, history).await?.into_payload())
}
