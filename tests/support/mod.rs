#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

use tdo::project::{Project, TASKS_DIR};
use tdo::store::TaskStore;
use tdo::task::Status;

pub fn tdo_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tdo").expect("binary");
    cmd.env_remove("TDO_DIR");
    cmd.env_remove("RUST_LOG");
    cmd
}

pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Empty directory, no TASKS/.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    /// Directory with TASKS/todo and TASKS/done.
    pub fn init() -> Self {
        let project = Self::empty();
        project.project().init_dirs().expect("init dirs");
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join(TASKS_DIR)
    }

    pub fn project(&self) -> Project {
        Project::new(self.root())
    }

    pub fn store(&self) -> TaskStore {
        TaskStore::new(self.project())
    }

    pub fn write_task(&self, status: Status, name: &str, contents: &str) -> PathBuf {
        let path = self.project().status_dir(status).join(name);
        fs::write(&path, contents).expect("write task");
        path
    }

    pub fn task_exists(&self, status: Status, name: &str) -> bool {
        self.project().status_dir(status).join(name).is_file()
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = tdo_cmd();
        cmd.current_dir(self.path());
        cmd
    }
}
