//! Fixtures shared by the integration tests: a throwaway host project in a
//! real git repository, and GitHub commit listings.

use git2::{Repository, Signature, Time};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A git repository with installed dependencies under `node_modules`
pub struct HostProject {
    pub dir: TempDir,
    repo: Repository,
    commits: i64,
}

impl HostProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let repo = Repository::init(dir.path()).expect("init repository");
        Self {
            dir,
            repo,
            commits: 0,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `node_modules/<name>/package.json` into the working tree
    pub fn install(&self, name: &str, repository_url: &str, git_head: &str) -> &Self {
        let manifest = json!({
            "name": name,
            "version": "1.0.0",
            "repository": { "type": "git", "url": repository_url },
            "gitHead": git_head,
        });
        self.write(
            &format!("node_modules/{name}/package.json"),
            &serde_json::to_string_pretty(&manifest).expect("serialize manifest"),
        )
    }

    pub fn write(&self, rel_path: &str, content: &str) -> &Self {
        let full_path = self.path().join(rel_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("create directories");
        }
        fs::write(full_path, content).expect("write file");
        self
    }

    /// Commit the whole working tree except the allow-list
    pub fn commit(&mut self, message: &str) -> git2::Oid {
        let mut index = self.repo.index().expect("open index");
        index
            .add_all(["node_modules"], git2::IndexAddOption::DEFAULT, None)
            .expect("stage files");
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = self.repo.find_tree(tree_id).expect("find tree");

        self.commits += 1;
        let time = Time::new(1_700_000_000 + self.commits * 60, 0);
        let signature = Signature::new("Test", "test@example.com", &time).expect("signature");
        let parents = match self.repo.head() {
            Ok(head) => vec![head.peel_to_commit().expect("head commit")],
            Err(_) => vec![],
        };
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parent_refs)
            .expect("commit")
    }
}

impl Default for HostProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Body of `GET /repos/{owner}/{repo}/commits`, newest first
pub fn github_commits(entries: &[(&str, &str)]) -> serde_json::Value {
    let items: Vec<_> = entries
        .iter()
        .enumerate()
        .map(|(i, (sha, message))| {
            json!({
                "sha": sha,
                "commit": {
                    "message": message,
                    "committer": {
                        "name": "Upstream Dev",
                        "date": format!("2024-05-{:02}T10:00:00Z", 28 - i),
                    }
                }
            })
        })
        .collect();
    json!(items)
}
