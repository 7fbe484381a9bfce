//! Task store over the `todo/` and `done/` directories.
//!
//! There is no index file: every call re-reads the directories. Ordinals are
//! positions in [`TaskStore::list_files`] (all of `done/`, then all of
//! `todo/`, each in filesystem enumeration order) and are only valid until
//! the next add or status change.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::project::Project;
use crate::query::{ListedTask, TaskSet};
use crate::task::{format_filename, Status, TagSet, Task};
use crate::taskfile::{self, ReadMode};

/// EXDEV: rename across filesystems.
#[cfg(unix)]
const CROSS_DEVICE_ERRNO: i32 = 18;
/// ERROR_NOT_SAME_DEVICE
#[cfg(windows)]
const CROSS_DEVICE_ERRNO: i32 = 17;
#[cfg(not(any(unix, windows)))]
const CROSS_DEVICE_ERRNO: i32 = -1;

/// One enumerated task file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPath {
    pub path: PathBuf,
    pub status: Status,
}

/// Outcome of [`TaskStore::change_status`].
#[derive(Debug, Clone)]
pub struct StatusChange {
    /// The task re-read from its new location, with a fresh ordinal.
    pub task: ListedTask,
    /// False when the task already had the requested status.
    pub moved: bool,
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    project: Project,
}

impl TaskStore {
    pub fn new(project: Project) -> Self {
        Self { project }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// All task files: `done/` entries first, then `todo/` entries.
    ///
    /// Hidden files (e.g. `.gitkeep`), subdirectories and dangling symlinks
    /// are not tasks.
    pub fn list_files(&self) -> Result<Vec<TaskPath>> {
        let mut files = Vec::new();
        for status in [Status::Done, Status::Todo] {
            let dir = self.project.status_dir(status);
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            };
            for entry in entries {
                let entry = entry?;
                // Follows symlinks, same rule as `task_by_filename`.
                if !entry.path().is_file() {
                    continue;
                }
                if entry.file_name().to_string_lossy().starts_with('.') {
                    continue;
                }
                files.push(TaskPath {
                    path: entry.path(),
                    status,
                });
            }
        }
        Ok(files)
    }

    /// Lazily parsed view of every task.
    ///
    /// Files that fail to parse are logged and skipped so one stray file does
    /// not hide the rest; their ordinals stay reserved.
    pub fn tasks(&self, mode: ReadMode) -> Result<TaskSet<'static>> {
        let files = self.list_files()?;
        Ok(TaskSet::new(files.into_iter().enumerate().filter_map(
            move |(idx, file)| match taskfile::parse(&file.path, file.status, mode) {
                Ok(task) => Some(ListedTask {
                    ordinal: idx + 1,
                    task,
                }),
                Err(err) => {
                    warn!(path = %file.path.display(), error = %err, "skipping unreadable task file");
                    None
                }
            },
        )))
    }

    /// Task at 1-based position `ordinal` of [`Self::list_files`].
    pub fn task_by_ordinal(&self, ordinal: usize, mode: ReadMode) -> Result<ListedTask> {
        let files = self.list_files()?;
        let file = ordinal
            .checked_sub(1)
            .and_then(|idx| files.get(idx))
            .ok_or_else(|| {
                Error::NotFound(format!("#{ordinal} (there are {} tasks)", files.len()))
            })?;
        let task = taskfile::parse(&file.path, file.status, mode)?;
        Ok(ListedTask { ordinal, task })
    }

    /// Task named `name`, looked up in `todo/` then `done/`.
    pub fn task_by_filename(&self, name: &str, mode: ReadMode) -> Result<ListedTask> {
        let name = name.trim();
        if name.is_empty()
            || name.starts_with('.')
            || name.contains('/')
            || name.contains(std::path::MAIN_SEPARATOR)
        {
            return Err(Error::NotFound(name.to_string()));
        }

        for status in [Status::Todo, Status::Done] {
            let path = self.project.status_dir(status).join(name);
            if !path.is_file() {
                continue;
            }
            let task = taskfile::parse(&path, status, mode)?;
            let ordinal = self.ordinal_of(&path)?;
            return Ok(ListedTask { ordinal, task });
        }

        Err(Error::NotFound(name.to_string()))
    }

    /// Resolve a user-supplied reference: an ordinal if it is a number and in
    /// range, otherwise a file name.
    pub fn resolve(&self, reference: &str, mode: ReadMode) -> Result<ListedTask> {
        let reference = reference.trim();
        if let Ok(ordinal) = reference.parse::<usize>() {
            match self.task_by_ordinal(ordinal, mode) {
                Err(Error::NotFound(_)) => {
                    debug!(reference, "ordinal out of range, trying file name");
                }
                other => return other,
            }
        }
        self.task_by_filename(reference, mode).map_err(|err| match err {
            Error::NotFound(_) => Error::NotFound(reference.to_string()),
            other => other,
        })
    }

    /// Move `task` into the directory for `to`, keeping its file name.
    ///
    /// Already being in `to` is a no-op. Uses an atomic rename; across
    /// filesystems it falls back to copy then remove, and a failed remove is
    /// reported as [`Error::PartialMove`].
    pub fn change_status(&self, task: &Task, to: Status) -> Result<StatusChange> {
        let from_path = self.project.status_dir(task.status).join(&task.filename);
        let to_path = self.project.status_dir(to).join(&task.filename);

        let moved = if task.status == to {
            false
        } else if !from_path.exists() && to_path.is_file() {
            // Moved by an earlier call with the same target.
            false
        } else {
            fs::create_dir_all(self.project.status_dir(to))?;
            move_file(&from_path, &to_path)?;
            debug!(file = %task.filename, from = %task.status, to = %to, "task moved");
            true
        };

        let mode = if task.content.is_some() {
            ReadMode::Full
        } else {
            ReadMode::MetadataOnly
        };
        let task = taskfile::parse(&to_path, to, mode)?;
        let ordinal = self.ordinal_of(&to_path)?;
        Ok(StatusChange {
            task: ListedTask { ordinal, task },
            moved,
        })
    }

    /// Write a new task into `todo/`, named after the current local time.
    pub fn add(&self, author: Option<&str>, tags: &TagSet, text: &str) -> Result<ListedTask> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidArgument("task text cannot be empty".to_string()));
        }

        let todo = self.project.todo_dir();
        fs::create_dir_all(&todo)?;
        let filename = format_filename(&Local::now().naive_local());
        let path = todo.join(&filename);
        taskfile::write_new(&path, &taskfile::serialize(author, tags, text))?;
        debug!(file = %filename, "task created");

        let task = taskfile::parse(&path, Status::Todo, ReadMode::Full)?;
        let ordinal = self.ordinal_of(&path)?;
        Ok(ListedTask { ordinal, task })
    }

    /// Number of task files per status.
    pub fn counts(&self) -> Result<(usize, usize)> {
        let files = self.list_files()?;
        let todo = files.iter().filter(|f| f.status == Status::Todo).count();
        Ok((todo, files.len() - todo))
    }

    fn ordinal_of(&self, path: &Path) -> Result<usize> {
        self.list_files()?
            .iter()
            .position(|file| file.path == path)
            .map(|idx| idx + 1)
            .ok_or_else(|| Error::NotFound(path.display().to_string()))
    }
}

fn move_file(from: &Path, to: &Path) -> Result<()> {
    if to.exists() {
        return Err(Error::AlreadyExists(to.to_path_buf()));
    }
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(err) if err.raw_os_error() == Some(CROSS_DEVICE_ERRNO) => {
            warn!(from = %from.display(), "rename crosses filesystems, copying instead");
            copy_then_remove(from, to)
        }
        Err(err) => Err(err.into()),
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> Result<()> {
    if let Err(err) = fs::copy(from, to) {
        let _ = fs::remove_file(to);
        return Err(err.into());
    }
    fs::remove_file(from).map_err(|err| {
        warn!(error = %err, "could not remove source after copy");
        Error::PartialMove {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        }
    })
}
