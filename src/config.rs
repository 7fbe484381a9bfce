//! Configuration loading and management
//!
//! Handles `TASKS/.config`, a small JSON object:
//!
//! ```json
//! {
//!     "username": "alice",
//!     "email": "alice@example.com",
//!     "projectname": "groceries"
//! }
//! ```
//!
//! Loaded once per command and passed down explicitly. Only `init` writes it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::project::Project;

/// Project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Name written on the `by:` line of new tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Display name of the project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projectname: Option<String>,
}

impl Config {
    /// Load configuration from a `.config` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content).map_err(|err| {
            Error::InvalidConfig(format!(
                "{} is not a valid config file: {err}",
                path.display()
            ))
        })
    }

    /// Load the project's configuration, or defaults when it has none.
    pub fn load_from_project(project: &Project) -> Result<Self> {
        let path = project.config_file();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file, four-space indented
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        std::fs::write(path, buf)?;
        Ok(())
    }

    /// Fill unset fields with environment-derived defaults.
    pub fn with_defaults(mut self, project: &Project) -> Self {
        if self.username.is_none() {
            self.username = default_username();
        }
        if self.projectname.is_none() {
            self.projectname = project
                .base_dir()
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
        }
        self
    }

    /// Value for the `by:` line: `username <email>`, or just the username.
    pub fn author(&self) -> Option<String> {
        let username = non_blank(self.username.as_deref())?;
        match non_blank(self.email.as_deref()) {
            Some(email) => Some(format!("{username} <{email}>")),
            None => Some(username.to_string()),
        }
    }
}

fn default_username() -> Option<String> {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
