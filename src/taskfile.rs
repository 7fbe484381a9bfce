//! Task file codec.
//!
//! A task file is UTF-8 text: an optional header of `by:` / `tags:` lines,
//! then the title line, then free text.
//!
//! ```text
//! by: alice
//! tags: home, errands
//!
//! Buy milk
//! semi-skimmed, two bottles
//! ```
//!
//! Nothing is escaped. A title that itself looks like `tags: ...` is read back
//! as metadata.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::task::{parse_filename, Status, TagSet, Task};

static METADATA_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(tags|by):(.*)$").expect("metadata regex"));

/// How much of a task file to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Stop right after the title line.
    MetadataOnly,
    /// Read the whole body into `content`.
    Full,
}

/// Parse a comma separated tag string into a tag set.
pub fn tags_as_set(raw: &str) -> TagSet {
    raw.split(',').collect()
}

/// Header fields and text extracted from task file lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub author: Option<String>,
    pub tags: TagSet,
    pub title: String,
    pub content: Option<String>,
}

/// Parse task file lines. Pure; no filesystem access.
pub fn parse_lines<I>(lines: I, mode: ReadMode) -> Parsed
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Parsed::default();
    let mut lines = lines.into_iter();

    for line in lines.by_ref() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = METADATA_LINE.captures(line) {
            let value = caps[2].trim();
            if caps[1].eq_ignore_ascii_case("by") {
                parsed.author = (!value.is_empty()).then(|| value.to_string());
            } else {
                parsed.tags = tags_as_set(value);
            }
            continue;
        }
        parsed.title = line.to_string();
        break;
    }

    if mode == ReadMode::Full {
        let body: Vec<String> = lines.map(|line| line.trim_end().to_string()).collect();
        let start = body.iter().position(|l| !l.is_empty()).unwrap_or(body.len());
        let end = body.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
        parsed.content = Some(body[start..end].join("\n"));
    }

    parsed
}

/// Read a task file.
///
/// `status` comes from the directory listing that produced `path`; it is not
/// re-derived from the path string.
pub fn parse(path: &Path, status: Status, mode: ReadMode) -> Result<Task> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::Parse(format!("invalid task path: {}", path.display())))?
        .to_string();
    let created_at = parse_filename(&filename)?;

    let file = File::open(path)?;
    let modified_at: DateTime<Local> = file.metadata()?.modified()?.into();

    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let done = mode == ReadMode::MetadataOnly && is_title_line(&line);
        lines.push(line);
        if done {
            break;
        }
    }

    let parsed = parse_lines(lines, mode);
    Ok(Task {
        filename,
        path: path.to_path_buf(),
        status,
        author: parsed.author,
        tags: parsed.tags,
        title: parsed.title,
        content: parsed.content,
        created_at,
        modified_at,
    })
}

fn is_title_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !METADATA_LINE.is_match(line)
}

/// Render a task file.
pub fn serialize(author: Option<&str>, tags: &TagSet, text: &str) -> String {
    let mut out = String::new();
    if let Some(author) = author.map(str::trim).filter(|a| !a.is_empty()) {
        out.push_str(&format!("by: {author}\n"));
    }
    if !tags.is_empty() {
        out.push_str(&format!("tags: {}\n\n", tags.render()));
    }
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Write a new task file, refusing to overwrite an existing one.
pub fn write_new(path: &Path, contents: &str) -> Result<()> {
    use std::io::Write;

    let mut file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(Error::AlreadyExists(path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
