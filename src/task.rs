//! Task entity for tdo.
//!
//! A task is one plain-text file under `TASKS/todo/` or `TASKS/done/`. Its file
//! name is the creation timestamp (`YYYY-MM-DD_HH:MM:SS.ffffff`) and doubles as
//! the only persistent identifier. Status is never written into the file: it
//! is whichever directory currently holds it.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// chrono format of a task file name.
pub const FILENAME_FORMAT: &str = "%Y-%m-%d_%H:%M:%S%.6f";

/// Byte length of a well-formed task file name.
const FILENAME_LEN: usize = 26;
/// Byte offset of the `.` before the microseconds.
const FRACTION_DOT: usize = 19;

/// Where a task currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Todo,
    Done,
}

impl Status {
    /// Name of the subdirectory of the storage root holding this status.
    pub fn dir_name(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::Done => "done",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "TODO",
            Status::Done => "DONE",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Status::Todo),
            "done" => Ok(Status::Done),
            other => Err(Error::Parse(format!(
                "invalid status '{other}' (expected todo|done)"
            ))),
        }
    }
}

/// Parse a task file name into its creation timestamp.
pub fn parse_filename(name: &str) -> Result<NaiveDateTime> {
    let invalid = |reason: String| {
        Error::Parse(format!(
            "'{name}' is not a task file name (expected YYYY-MM-DD_HH:MM:SS.ffffff): {reason}"
        ))
    };
    // chrono treats `%.6f` as optional when parsing; the fraction is mandatory.
    if name.len() != FILENAME_LEN || name.as_bytes().get(FRACTION_DOT) != Some(&b'.') {
        return Err(invalid("missing microsecond fraction".to_string()));
    }
    NaiveDateTime::parse_from_str(name, FILENAME_FORMAT).map_err(|err| invalid(err.to_string()))
}

/// Render a timestamp as a task file name.
pub fn format_filename(created: &NaiveDateTime) -> String {
    created.format(FILENAME_FORMAT).to_string()
}

/// Ordered, de-duplicated set of lowercase tags.
///
/// Declaration order is kept for display; equality and membership ignore it.
#[derive(Debug, Clone, Default)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag after trimming and lowercasing it. Blank tags are ignored.
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || self.0.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        self.0.contains(&tag)
    }

    pub fn intersects(&self, other: &TagSet) -> bool {
        self.0.iter().any(|tag| other.0.contains(tag))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Canonical `tags:` rendering: comma separated, declaration order.
    pub fn render(&self) -> String {
        self.0.join(", ")
    }
}

impl PartialEq for TagSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.0.iter().all(|tag| other.0.contains(tag))
    }
}

impl Eq for TagSet {}

impl<'a> FromIterator<&'a str> for TagSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl Serialize for TagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// One task, as read from disk.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub filename: String,
    pub path: PathBuf,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub tags: TagSet,
    pub title: String,
    /// Body after the title line. `None` for metadata-only reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub created_at: NaiveDateTime,
    pub modified_at: DateTime<Local>,
}

impl Task {
    /// Full text of the task (title plus body), as it would be written back.
    pub fn text(&self) -> String {
        match self.content.as_deref() {
            Some(content) if !content.is_empty() => format!("{}\n{}", self.title, content),
            _ => self.title.clone(),
        }
    }
}
