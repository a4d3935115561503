//! Deciding, per dependency, which upstream commit range changed between two host revisions

use crate::error::ChangelogError;
use crate::manifest::ManifestReader;
use crate::ports::VersionControl;
use crate::types::{CommitId, DependencyChange, ManifestSnapshot, SkipReason, UpstreamChange};

/// Compares a dependency's manifest snapshots at the two boundaries
pub struct ChangeResolver<'a, V> {
    reader: ManifestReader<'a, V>,
}

impl<'a, V: VersionControl> ChangeResolver<'a, V> {
    pub fn new(vcs: &'a V, modules_dir: &'a str) -> Self {
        Self {
            reader: ManifestReader::new(vcs, modules_dir),
        }
    }

    /// Never fails: a dependency that cannot be resolved comes back `Unresolvable`
    pub async fn resolve_change(
        &self,
        name: &str,
        current: &CommitId,
        previous: &CommitId,
    ) -> UpstreamChange {
        let current_snapshot = match self.reader.read(name, current).await {
            Ok(snapshot) => snapshot,
            Err(err) => return UpstreamChange::Unresolvable(skip_reason(err, current)),
        };
        let previous_snapshot = match self.reader.read(name, previous).await {
            Ok(snapshot) => snapshot,
            Err(err) => return UpstreamChange::Unresolvable(skip_reason(err, previous)),
        };

        compare_snapshots(&current_snapshot, &previous_snapshot)
    }
}

/// The repository is taken from the current snapshot
pub fn compare_snapshots(current: &ManifestSnapshot, previous: &ManifestSnapshot) -> UpstreamChange {
    let Some(repo_slug) = current.repo_slug() else {
        return UpstreamChange::Unresolvable(SkipReason::UnrecognizedRepository {
            url: current.repository_url.clone(),
        });
    };

    if current.upstream_head == previous.upstream_head {
        return UpstreamChange::Unchanged;
    }

    match (&previous.upstream_head, &current.upstream_head) {
        (Some(previous_head), Some(current_head)) => UpstreamChange::Changed(DependencyChange {
            name: current.name.clone(),
            repo_slug,
            previous_upstream_head: previous_head.clone(),
            current_upstream_head: current_head.clone(),
        }),
        _ => UpstreamChange::Unresolvable(SkipReason::MissingUpstreamHead),
    }
}

fn skip_reason(err: ChangelogError, at: &CommitId) -> SkipReason {
    match err {
        ChangelogError::NotPresent { .. } => SkipReason::NotPresent { commit: at.clone() },
        ChangelogError::InvalidManifest { source, .. } => {
            SkipReason::InvalidManifest(source.to_string())
        }
        other => SkipReason::ReadFailed(other.user_message()),
    }
}
