//! Rendering a changelog payload as html, wikitext or json

use crate::types::{ChangelogPayload, DependencyReport, Result};
use clap::ValueEnum;
use std::fmt;
use upstream::UpstreamCommit;

/// Requested output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// HTML fragment with one section per dependency
    #[value(aliases = ["htm", "web"])]
    Html,
    /// MediaWiki markup
    #[value(alias = "wt")]
    Wikitext,
    /// The raw payload
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Html => "html",
            Self::Wikitext => "wikitext",
            Self::Json => "json",
        };
        write!(f, "{name}")
    }
}

/// Trait for rendering a changelog payload in a specific format
pub trait OutputRenderer {
    fn render(&self, payload: &ChangelogPayload) -> Result<String>;
}

/// Render `payload` with the renderer matching `format`
pub fn render(payload: &ChangelogPayload, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => HtmlRenderer.render(payload),
        OutputFormat::Wikitext => WikitextRenderer.render(payload),
        OutputFormat::Json => JsonRenderer::new().render(payload),
    }
}

/// JSON renderer that produces the payload as structured output
pub struct JsonRenderer {
    pub pretty: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputRenderer for JsonRenderer {
    fn render(&self, payload: &ChangelogPayload) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(payload)?
        } else {
            serde_json::to_string(payload)?
        };
        Ok(json)
    }
}

pub struct WikitextRenderer;

impl OutputRenderer for WikitextRenderer {
    fn render(&self, payload: &ChangelogPayload) -> Result<String> {
        let mut out = String::new();
        for report in &payload.repos {
            out.push_str(&format!("== {} ==\n", report.name));
            out.push_str(&format!(
                "{} → {}\n",
                short(report.previous.as_str()),
                short(report.current.as_str())
            ));
            for commit in &report.commits {
                out.push_str(&format!(
                    "* [{} {}] {} ({})\n",
                    commit.url,
                    commit.short_sha(),
                    wiki_escape(&commit.message_summary),
                    commit_date(commit)
                ));
            }
            out.push('\n');
        }
        Ok(out.trim_end().to_string())
    }
}

pub struct HtmlRenderer;

impl OutputRenderer for HtmlRenderer {
    fn render(&self, payload: &ChangelogPayload) -> Result<String> {
        let mut out = String::from("<div class=\"changelog\">\n");
        for report in &payload.repos {
            out.push_str(&html_section(report));
        }
        out.push_str("</div>\n");
        Ok(out)
    }
}

fn html_section(report: &DependencyReport) -> String {
    let mut section = format!(
        "  <h2>{}</h2>\n  <p class=\"range\">{} &rarr; {}</p>\n  <ul>\n",
        html_escape(&report.name),
        html_escape(short(report.previous.as_str())),
        html_escape(short(report.current.as_str()))
    );
    for commit in &report.commits {
        section.push_str(&format!(
            "    <li><a href=\"{}\" title=\"{}\">{}</a> {} <span class=\"date\">{}</span></li>\n",
            html_escape(&commit.url),
            html_escape(&commit.message),
            html_escape(commit.short_sha()),
            html_escape(&commit.message_summary),
            commit_date(commit)
        ));
    }
    section.push_str("  </ul>\n");
    section
}

fn commit_date(commit: &UpstreamCommit) -> String {
    commit.date.format("%Y-%m-%d").to_string()
}

fn short(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// `[` and `]` would start a link in a summary line
fn wiki_escape(text: &str) -> String {
    text.replace('[', "&#91;").replace(']', "&#93;")
}
