use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::ui;
use changelog::{ChangelogConfig, GitVersionControl, NpmLister, OutputFormat};
use std::path::Path;
use tracing::debug;
use upstream::{GithubClient, GithubConfig};

pub fn execute(cli: Cli) -> Result<()> {
    // evaluations are interleaved on one thread, git reads go to the blocking pool
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Other(format!("Failed to create async runtime: {e}")))?;

    rt.block_on(execute_async(cli))
}

async fn execute_async(cli: Cli) -> Result<()> {
    let mut config = ChangelogConfig::new(cli.dir.clone())
        .with_revisions(cli.head_rev.clone(), cli.rev.clone())
        .with_limit(cli.limit)
        .with_max_concurrent(cli.jobs);
    if let Some(allow_list) = cli.allow_list()? {
        config = config.with_allow_list(allow_list);
    }

    let github = GithubConfig::default().with_token(cli.resolved_token());
    debug!(?github, "history client configuration");
    let history = GithubClient::new(github)?;

    let vcs = GitVersionControl::new(config.project_dir.clone());
    let lister = NpmLister::from_config(&config);

    let run = changelog::run_changelog(&config, &vcs, &lister, &history)
        .await
        .map_err(|e| CliError::from(e).with_context("Could not generate changelog"))?;

    let failures = run.skipped().filter(|(_, reason)| !reason.is_expected()).count();
    let boundaries = run.boundaries.clone();
    let payload = run.into_payload();

    if payload.is_empty() {
        ui::info_message(&format!(
            "No dependency changes between {} and {}",
            boundaries.previous, boundaries.current
        ));
    }
    if failures > 0 {
        ui::warning_message(&format!(
            "{failures} dependencies could not be checked, run with -v for details"
        ));
    }

    let rendered = changelog::render(&payload, cli.format)?;
    write_output(&rendered, cli.output.as_deref(), cli.format)
}

fn write_output(rendered: &str, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n")).map_err(|source| CliError::Output {
                path: path.to_path_buf(),
                source,
            })?;
            ui::success_message(&format!("Wrote {format} changelog to {}", path.display()));
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
