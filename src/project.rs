//! Project location and layout for tdo
//!
//! A project is any directory containing a `TASKS/` storage root:
//!
//! ```text
//! TASKS/
//!   .config                 # JSON key-value config (username, email, projectname)
//!   todo/
//!     <timestamp-filename>  # one file per open task
//!   done/
//!     <timestamp-filename>  # one file per closed task
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::task::Status;

/// Default name of the storage root directory
pub const TASKS_DIR: &str = "TASKS";

/// Name of the config file inside the storage root
pub const CONFIG_FILE: &str = ".config";

/// Absolute start directory for discovery: `dir` if given, else the current
/// directory. Relative paths are anchored at the current directory so the
/// upward walk reaches real ancestors.
pub fn start_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    let start = match dir {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    Ok(std::path::absolute(start)?)
}

/// Walk up from `start` (inclusive) looking for a directory entry named
/// `dir_name` that is itself a directory. Nearest match wins.
pub fn find_storage_root(start: &Path, dir_name: &str) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(dir_name);
        if candidate.is_dir() {
            debug!(root = %candidate.display(), "found storage root");
            return Some(candidate);
        }
        match current.parent() {
            Some(parent) if parent != current => current = parent.to_path_buf(),
            _ => return None,
        }
    }
}

/// Paths of one resolved project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// The `TASKS/` directory itself
    root: PathBuf,
}

impl Project {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Locate the nearest project from `start`.
    pub fn discover(start: &Path) -> Option<Self> {
        find_storage_root(start, TASKS_DIR).map(Self::new)
    }

    /// Like `discover`, but a missing project is an error.
    pub fn require(start: &Path) -> Result<Self> {
        Self::discover(start).ok_or_else(|| Error::ProjectNotFound(start.to_path_buf()))
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory that holds `TASKS/`
    pub fn base_dir(&self) -> &Path {
        self.root.parent().unwrap_or(&self.root)
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn status_dir(&self, status: Status) -> PathBuf {
        self.root.join(status.dir_name())
    }

    pub fn todo_dir(&self) -> PathBuf {
        self.status_dir(Status::Todo)
    }

    pub fn done_dir(&self) -> PathBuf {
        self.status_dir(Status::Done)
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Create `TASKS/`, `todo/` and `done/` as needed. Returns the directories
    /// that did not exist before.
    pub fn init_dirs(&self) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        for dir in [self.root.clone(), self.todo_dir(), self.done_dir()] {
            if ensure_dir(&dir)? {
                created.push(dir);
            }
        }
        Ok(created)
    }

    pub fn is_initialized(&self) -> bool {
        self.todo_dir().is_dir() && self.done_dir().is_dir()
    }
}

fn ensure_dir(path: &Path) -> Result<bool> {
    if path.exists() {
        if !path.is_dir() {
            return Err(Error::AlreadyExists(path.to_path_buf()));
        }
        return Ok(false);
    }

    fs::create_dir_all(path)?;
    Ok(true)
}
