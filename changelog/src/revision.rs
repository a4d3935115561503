use crate::error::ChangelogError;
use crate::ports::VersionControl;
use crate::types::{Boundaries, Result};
use tracing::info;

/// Resolve the two boundary revisions once for the whole run
pub async fn resolve_boundaries<V: VersionControl>(
    vcs: &V,
    current_rev: &str,
    previous_rev: &str,
) -> Result<Boundaries> {
    let current = resolve(vcs, current_rev).await?;
    let previous = resolve(vcs, previous_rev).await?;

    info!(%current, %previous, "resolved boundary revisions");
    Ok(Boundaries { current, previous })
}

async fn resolve<V: VersionControl>(vcs: &V, revision: &str) -> Result<crate::types::CommitId> {
    vcs.resolve_revision(revision)
        .await
        .map_err(|source| ChangelogError::Resolution {
            revision: revision.to_string(),
            source,
        })
}
