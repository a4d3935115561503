use once_cell::sync::Lazy;
use regex::Regex;

// https://github.com/o/r.git, git+https://..., git+ssh://git@github.com/o/r.git, git@github.com:o/r.git
static REPO_SLUG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*?github\.com[/:]([^/]+/[^/]+?)\.git$").expect("repository pattern is valid")
});

// one `npm ls` tree line: drawing characters, then `name@version`
static NPM_LS_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[└├─┬│\s]*(.+?)@").expect("npm ls pattern is valid"));

/// `owner/repo` of a recognized hosting URL
pub fn extract_repo_slug(url: &str) -> Option<String> {
    REPO_SLUG
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Dependency names from `npm ls` output, de-duplicated in first-seen order
pub fn parse_npm_ls(output: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for line in output.lines() {
        let Some(name) = NPM_LS_ENTRY
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        else {
            continue;
        };
        if name.contains(char::is_whitespace) {
            continue;
        }
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }

    names
}
