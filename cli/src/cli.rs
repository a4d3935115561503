use changelog::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "deplog")]
#[command(
    author,
    version,
    about = "Changelog of upstream commits for dependencies updated between two revisions"
)]
pub struct Cli {
    /// Output format
    #[clap(short, long, value_enum, default_value_t = OutputFormat::Wikitext)]
    pub format: OutputFormat,

    /// Access token for the GitHub API
    #[clap(short, long, env = "TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Previous revision of the project
    #[clap(short, long, default_value = "HEAD^")]
    pub rev: String,

    /// Current revision of the project
    #[clap(short = 'H', long, default_value = "HEAD")]
    pub head_rev: String,

    /// Maximum number of dependencies to look at
    #[clap(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Write the changelog to this file instead of stdout
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Allow-list of dependency names, one per line, relative to the current directory
    /// [default: .changelog in the project directory]
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Project directory
    #[clap(short = 'C', long, default_value = ".")]
    pub dir: PathBuf,

    /// Maximum number of dependencies looked at concurrently
    #[clap(short, long, default_value_t = 4)]
    pub jobs: usize,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// `--token`, then `TOKEN`, then `GITHUB_TOKEN`
    pub fn resolved_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.trim().is_empty())
    }

    /// `--config` resolved against the current directory, `None` when not given
    pub fn allow_list(&self) -> std::io::Result<Option<PathBuf>> {
        match &self.config {
            Some(path) if path.is_relative() => Ok(Some(std::env::current_dir()?.join(path))),
            other => Ok(other.clone()),
        }
    }
}
