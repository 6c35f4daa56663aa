//! Workspace root confinement
//!
//! Every path argument a tool receives is interpreted relative to the
//! workspace root. Paths that would land outside the root (`..` segments,
//! absolute paths elsewhere, symlinks pointing out) are refused.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Directories never descended into by listing and search tools.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target"];

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open a workspace rooted at an existing directory.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a tool argument to an absolute path inside the root.
    ///
    /// The target does not have to exist. When it (or one of its ancestors)
    /// does exist, symlinks are followed and the real location must still
    /// be inside the root.
    pub fn resolve(&self, raw: &str) -> Result<PathBuf, String> {
        let raw = raw.trim();
        let candidate = if raw.is_empty() {
            self.root.clone()
        } else {
            let path = Path::new(raw);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.root.join(path)
            }
        };

        let normalized = normalize(&candidate);
        if !normalized.starts_with(&self.root) {
            return Err(format!("Path '{}' is outside the workspace", raw));
        }

        if let Some(real) = deepest_existing(&normalized)
            && !real.starts_with(&self.root)
        {
            return Err(format!("Path '{}' is outside the workspace", raw));
        }

        Ok(normalized)
    }

    /// Path relative to the root, for display. Falls back to the full path.
    pub fn relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.display().to_string(),
            Err(_) => path.display().to_string(),
        }
    }
}

/// Whether a directory entry should be skipped by walkers.
pub(crate) fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || SKIPPED_DIRS.contains(&name)
}

/// Lexically collapse `.` and `..` without touching the file system.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonical form of the longest existing prefix of `path`, with the
/// missing tail re-attached.
fn deepest_existing(path: &Path) -> Option<PathBuf> {
    let mut existing = path;
    let mut tail = Vec::new();
    loop {
        if let Ok(real) = existing.canonicalize() {
            let mut real = real;
            for part in tail.iter().rev() {
                real.push(part);
            }
            return Some(real);
        }
        tail.push(existing.file_name()?.to_os_string());
        existing = existing.parent()?;
    }
}
