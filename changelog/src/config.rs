use std::path::{Path, PathBuf};

pub const DEFAULT_ALLOW_LIST: &str = ".changelog";
pub const DEFAULT_MODULES_DIR: &str = "node_modules";

/// Configuration for one changelog run
#[derive(Debug, Clone)]
pub struct ChangelogConfig {
    /// Host project: git work tree and install root
    pub project_dir: PathBuf,
    /// Install directory, relative to `project_dir` and to the repository root
    pub modules_dir: String,
    /// Allow-list file, relative paths are taken from `project_dir`
    pub allow_list: PathBuf,
    pub current_rev: String,
    pub previous_rev: String,
    /// Maximum number of dependencies evaluated, in selection order
    pub limit: usize,
    /// Maximum number of dependencies evaluated at the same time
    pub max_concurrent: usize,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            modules_dir: DEFAULT_MODULES_DIR.to_string(),
            allow_list: PathBuf::from(DEFAULT_ALLOW_LIST),
            current_rev: "HEAD".to_string(),
            previous_rev: "HEAD^".to_string(),
            limit: 10,
            max_concurrent: 4,
        }
    }
}

impl ChangelogConfig {
    pub fn new<P: Into<PathBuf>>(project_dir: P) -> Self {
        Self {
            project_dir: project_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_revisions<S: Into<String>>(mut self, current: S, previous: S) -> Self {
        self.current_rev = current.into();
        self.previous_rev = previous.into();
        self
    }

    pub fn with_allow_list<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.allow_list = path.into();
        self
    }

    pub fn with_modules_dir<S: Into<String>>(mut self, modules_dir: S) -> Self {
        self.modules_dir = modules_dir.into();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Configure maximum concurrent evaluations
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn allow_list_path(&self) -> PathBuf {
        if self.allow_list.is_absolute() {
            self.allow_list.clone()
        } else {
            self.project_dir.join(&self.allow_list)
        }
    }

    /// Repository-relative path of a dependency's manifest
    pub fn manifest_path(&self, name: &str) -> String {
        manifest_path(&self.modules_dir, name)
    }

    /// Working-tree path of a dependency's installed manifest
    pub fn installed_manifest(&self, name: &str) -> PathBuf {
        self.project_dir.join(Path::new(&self.manifest_path(name)))
    }
}

pub(crate) fn manifest_path(modules_dir: &str, name: &str) -> String {
    format!("{}/{}/package.json", modules_dir.trim_end_matches('/'), name)
}
