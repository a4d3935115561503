//! Which dependencies a run looks at

use crate::config::ChangelogConfig;
use crate::error::ChangelogError;
use crate::ports::DependencyLister;
use crate::types::Result;
use tracing::debug;

/// Names from an allow-list file: one per line, blank lines ignored
pub fn parse_allow_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Dependencies to evaluate, in order.
///
/// An existing allow-list always wins over enumerating installed dependencies.
pub async fn select<L: DependencyLister>(config: &ChangelogConfig, lister: &L) -> Result<Vec<String>> {
    let path = config.allow_list_path();

    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ChangelogError::AllowList {
                path: path.clone(),
                source,
            })?;
        let names = parse_allow_list(&content);
        debug!(path = %path.display(), count = names.len(), "using dependency allow-list");
        return Ok(names);
    }

    let mut names: Vec<String> = Vec::new();
    for name in lister.list_installed().await? {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    debug!(count = names.len(), "enumerated installed dependencies");
    Ok(names)
}
