//! Best-effort resolution of caller-supplied candidate roots.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Directory the agent is installed in.
pub fn agent_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Walk up from `start` to the first ancestor holding a `.git` entry.
///
/// Falls back to `start` itself when no ancestor qualifies.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .skip(1)
        .find(|ancestor| ancestor.join(".git").exists())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| start.to_path_buf())
}

/// Canonical form of `path`, if the filesystem can produce one.
///
/// `None` means the path is its own key; it is never an error.
pub fn canonical_key(path: &Path) -> Option<PathBuf> {
    std::fs::canonicalize(path).ok()
}

/// Rewrite a relative path so it cannot climb above the directory it is joined to.
///
/// Leading `./` and `../` segments are dropped, and any interior `..` that
/// would step past the start is ignored. An empty result becomes `.`.
pub fn contain_relative(raw: &str) -> PathBuf {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();

    for component in Path::new(raw).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::ParentDir => {
                parts.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Resolves candidate roots against the process, agent and project directories.
#[derive(Debug, Clone)]
pub struct PathResolver {
    project_root: PathBuf,
    agent_root: PathBuf,
    cwd: Option<PathBuf>,
}

impl PathResolver {
    pub fn new(project_root: PathBuf, agent_root: PathBuf) -> Self {
        let project_root = canonical_key(&project_root).unwrap_or(project_root);
        Self {
            project_root,
            agent_root,
            cwd: std::env::current_dir().ok(),
        }
    }

    /// Resolver rooted at the `.git` ancestor of the agent directory.
    pub fn discover() -> Self {
        let agent = agent_root();
        Self::new(find_project_root(&agent), agent)
    }

    /// Override the working directory used for the cwd-joined candidate.
    pub fn with_cwd(mut self, cwd: PathBuf) -> Self {
        self.cwd = Some(cwd);
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Ordered candidate list for a raw path, before deduplication.
    pub fn candidates(&self, raw_path: &str) -> Vec<PathBuf> {
        let raw = raw_path.trim();
        let given = PathBuf::from(raw);
        let mut candidates = vec![given.clone()];

        if !given.is_absolute() {
            if let Some(cwd) = &self.cwd {
                candidates.push(cwd.join(&given));
            }
            candidates.push(self.agent_root.join(&given));
            candidates.push(self.project_root.join(contain_relative(raw)));
        }

        candidates
    }

    /// First existing candidate for `raw_path`, or `None` when nothing exists.
    pub fn resolve(&self, raw_path: &str) -> Option<PathBuf> {
        let mut checked: HashSet<PathBuf> = HashSet::new();

        for option in self.candidates(raw_path) {
            let key = canonical_key(&option).unwrap_or_else(|| option.clone());
            if !checked.insert(key) {
                continue;
            }
            if option.exists() {
                return Some(option);
            }
        }

        None
    }

    /// Display path for a discovered file: project-relative, else cwd-relative, else as is.
    pub fn display_path(&self, file: &Path) -> String {
        if let Ok(relative) = file.strip_prefix(&self.project_root) {
            return relative.to_string_lossy().into_owned();
        }
        if let Some(cwd) = &self.cwd {
            if let Ok(relative) = file.strip_prefix(cwd) {
                return relative.to_string_lossy().into_owned();
            }
        }
        file.to_string_lossy().into_owned()
    }
}
