//! Composable filter / order / limit pipeline over tasks.
//!
//! A [`TaskSet`] is a single-pass lazy stream. Anything that has to be walked
//! more than once (e.g. rendering both status groups of one listing) goes
//! through [`TaskSet::load`] first, which freezes the stream into a
//! [`LoadedTasks`] snapshot that can hand out fresh `TaskSet`s.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::task::{Status, TagSet, Task};

/// Suffix on a sort field that flips it to descending order.
pub const DESCENDING_MARKER: char = '-';

/// A task paired with its 1-based position in one store enumeration.
///
/// The ordinal only means something relative to the listing that produced
/// it; any add or status change can shift it.
#[derive(Debug, Clone, Serialize)]
pub struct ListedTask {
    pub ordinal: usize,
    #[serde(flatten)]
    pub task: Task,
}

impl Deref for ListedTask {
    type Target = Task;

    fn deref(&self) -> &Task {
        &self.task
    }
}

/// Fields a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Created,
    Modified,
    Title,
    Author,
    Filename,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Created,
        SortField::Modified,
        SortField::Title,
        SortField::Author,
        SortField::Filename,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SortField::Created => "created",
            SortField::Modified => "modified",
            SortField::Title => "title",
            SortField::Author => "author",
            SortField::Filename => "filename",
        }
    }

    fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortField::Created => a.created_at.cmp(&b.created_at),
            SortField::Modified => a.modified_at.cmp(&b.modified_at),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Author => a.author.cmp(&b.author),
            SortField::Filename => a.filename.cmp(&b.filename),
        }
    }
}

/// A parsed `--orderby` value: field name, optionally followed by `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub descending: bool,
}

impl FromStr for SortSpec {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let raw = s.trim();
        let (name, descending) = match raw.strip_suffix(DESCENDING_MARKER) {
            Some(name) => (name.trim(), true),
            None => (raw, false),
        };
        let field = SortField::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                let known: Vec<&str> = SortField::ALL.iter().map(|f| f.name()).collect();
                Error::InvalidArgument(format!(
                    "unknown sort field '{name}' (expected one of: {})",
                    known.join(", ")
                ))
            })?;
        Ok(SortSpec { field, descending })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field.name())?;
        if self.descending {
            write!(f, "{DESCENDING_MARKER}")?;
        }
        Ok(())
    }
}

/// Lazy, single-pass task stream.
pub struct TaskSet<'a> {
    inner: Box<dyn Iterator<Item = ListedTask> + 'a>,
}

impl<'a> TaskSet<'a> {
    pub fn new<I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = ListedTask>,
        I::IntoIter: 'a,
    {
        Self {
            inner: Box::new(tasks.into_iter()),
        }
    }

    /// Keep tasks currently in `status`.
    pub fn with_status(self, status: Status) -> Self {
        Self::new(self.inner.filter(move |task| task.status == status))
    }

    /// Keep tasks sharing at least one tag with `tags`.
    pub fn with_tags(self, tags: &TagSet) -> Result<Self> {
        if tags.is_empty() {
            return Err(Error::InvalidArgument(
                "tag filter needs at least one tag".to_string(),
            ));
        }
        let tags = tags.clone();
        Ok(Self::new(
            self.inner.filter(move |task| task.tags.intersects(&tags)),
        ))
    }

    /// Stable sort by `spec`. Materializes everything upstream.
    pub fn order_by(self, spec: SortSpec) -> Self {
        let mut tasks: Vec<ListedTask> = self.inner.collect();
        tasks.sort_by(|a, b| {
            if spec.descending {
                spec.field.compare(b, a)
            } else {
                spec.field.compare(a, b)
            }
        });
        Self::new(tasks)
    }

    /// At most `n` tasks; `n <= 0` leaves the stream untouched.
    pub fn limit(self, n: i64) -> Self {
        match usize::try_from(n) {
            Ok(n) if n > 0 => Self::new(self.inner.take(n)),
            _ => self,
        }
    }

    /// Freeze the pipeline into a reusable snapshot.
    pub fn load(self) -> LoadedTasks {
        LoadedTasks {
            tasks: self.inner.collect(),
        }
    }
}

impl Iterator for TaskSet<'_> {
    type Item = ListedTask;

    fn next(&mut self) -> Option<ListedTask> {
        self.inner.next()
    }
}

/// Materialized result of a [`TaskSet`] pipeline.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct LoadedTasks {
    tasks: Vec<ListedTask>,
}

impl LoadedTasks {
    /// Start a fresh pipeline over this snapshot.
    pub fn set(&self) -> TaskSet<'_> {
        TaskSet::new(self.tasks.iter().cloned())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListedTask> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl IntoIterator for LoadedTasks {
    type Item = ListedTask;
    type IntoIter = std::vec::IntoIter<ListedTask>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}

impl<'a> IntoIterator for &'a LoadedTasks {
    type Item = &'a ListedTask;
    type IntoIter = std::slice::Iter<'a, ListedTask>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::parse_filename;
    use chrono::Local;
    use std::path::PathBuf;

    fn task(ordinal: usize, filename: &str, status: Status, tags: &str, title: &str) -> ListedTask {
        ListedTask {
            ordinal,
            task: Task {
                filename: filename.to_string(),
                path: PathBuf::from(filename),
                status,
                author: None,
                tags: crate::taskfile::tags_as_set(tags),
                title: title.to_string(),
                content: None,
                created_at: parse_filename(filename).expect("filename"),
                modified_at: Local::now(),
            },
        }
    }

    fn sample() -> Vec<ListedTask> {
        vec![
            task(1, "2020-01-02_00:00:00.000000", Status::Done, "x", "bravo"),
            task(2, "2020-01-03_00:00:00.000000", Status::Todo, "x, y", "alpha"),
            task(3, "2020-01-01_00:00:00.000000", Status::Todo, "z", "charlie"),
        ]
    }

    fn ordinals(set: TaskSet<'_>) -> Vec<usize> {
        set.map(|t| t.ordinal).collect()
    }

    #[test]
    fn with_status_filters() {
        assert_eq!(ordinals(TaskSet::new(sample()).with_status(Status::Todo)), vec![2, 3]);
        assert_eq!(ordinals(TaskSet::new(sample()).with_status(Status::Done)), vec![1]);
    }

    #[test]
    fn with_tags_needs_intersection() {
        let tags = crate::taskfile::tags_as_set("X");
        let set = TaskSet::new(sample()).with_tags(&tags).unwrap();
        assert_eq!(ordinals(set), vec![1, 2]);

        let none = crate::taskfile::tags_as_set("nonexistent");
        assert!(TaskSet::new(sample()).with_tags(&none).unwrap().next().is_none());
    }

    #[test]
    fn with_tags_rejects_empty_filter() {
        let result = TaskSet::new(sample()).with_tags(&TagSet::new());
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn sort_spec_parses_direction() {
        let spec: SortSpec = "created-".parse().unwrap();
        assert_eq!(spec.field, SortField::Created);
        assert!(spec.descending);
        assert_eq!(spec.to_string(), "created-");

        let spec: SortSpec = " Title ".parse().unwrap();
        assert_eq!(spec.field, SortField::Title);
        assert!(!spec.descending);
    }

    #[test]
    fn sort_spec_rejects_unknown_field() {
        assert!(matches!("priority".parse::<SortSpec>(), Err(Error::InvalidArgument(_))));
        assert!(matches!("-".parse::<SortSpec>(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn order_by_created_both_directions() {
        let asc = TaskSet::new(sample()).order_by("created".parse().unwrap());
        assert_eq!(ordinals(asc), vec![3, 1, 2]);
        let desc = TaskSet::new(sample()).order_by("created-".parse().unwrap());
        assert_eq!(ordinals(desc), vec![2, 1, 3]);
    }

    #[test]
    fn order_by_is_stable_for_ties() {
        let mut tasks = sample();
        for t in &mut tasks {
            t.task.title = "same".to_string();
        }
        let asc = TaskSet::new(tasks.clone()).order_by("title".parse().unwrap());
        assert_eq!(ordinals(asc), vec![1, 2, 3]);
        let desc = TaskSet::new(tasks).order_by("title-".parse().unwrap());
        assert_eq!(ordinals(desc), vec![1, 2, 3]);
    }

    #[test]
    fn limit_truncates_unless_non_positive() {
        assert_eq!(ordinals(TaskSet::new(sample()).limit(2)), vec![1, 2]);
        assert_eq!(ordinals(TaskSet::new(sample()).limit(10)), vec![1, 2, 3]);
        assert_eq!(ordinals(TaskSet::new(sample()).limit(0)), vec![1, 2, 3]);
        assert_eq!(ordinals(TaskSet::new(sample()).limit(-5)), vec![1, 2, 3]);
    }

    #[test]
    fn loaded_snapshot_is_reusable() {
        let loaded = TaskSet::new(sample())
            .order_by("title".parse().unwrap())
            .load();
        assert_eq!(loaded.len(), 3);
        assert_eq!(ordinals(loaded.set().with_status(Status::Todo)), vec![2, 3]);
        assert_eq!(ordinals(loaded.set().with_status(Status::Done)), vec![1]);
        assert_eq!(ordinals(loaded.set()), vec![2, 1, 3]);
    }
}
