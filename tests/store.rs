mod support;

use support::TestProject;
use tdo::error::Error;
use tdo::query::TaskSet;
use tdo::task::Status;
use tdo::taskfile::{self, tags_as_set, ReadMode};

fn seeded() -> TestProject {
    let project = TestProject::init();
    project.write_task(
        Status::Todo,
        "2022-02-01_09:00:00.000001",
        "tags: x, y\n\nFirst\n",
    );
    project.write_task(Status::Todo, "2022-02-01_09:00:00.000002", "tags: z\n\nSecond\n");
    project.write_task(Status::Done, "2022-02-01_09:00:00.000003", "Third\n");
    project
}

#[test]
fn list_files_counts_both_directories() {
    let project = seeded();
    let store = project.store();
    let files = store.list_files().expect("list");
    assert_eq!(files.len(), 3);
    assert_eq!(store.counts().expect("counts"), (2, 1));
}

#[test]
fn every_ordinal_in_range_resolves() {
    let project = seeded();
    let store = project.store();
    let len = store.list_files().expect("list").len();

    for n in 1..=len {
        let task = store
            .task_by_ordinal(n, ReadMode::MetadataOnly)
            .expect("in range");
        assert_eq!(task.ordinal, n);
    }
    for n in [0, len + 1, len + 50] {
        assert!(matches!(
            store.task_by_ordinal(n, ReadMode::MetadataOnly),
            Err(Error::NotFound(_))
        ));
    }
}

#[test]
fn ordinals_match_listing_positions() {
    let project = seeded();
    let store = project.store();
    let listed = store.tasks(ReadMode::MetadataOnly).expect("tasks").load();
    for task in &listed {
        let again = store
            .task_by_ordinal(task.ordinal, ReadMode::MetadataOnly)
            .expect("lookup");
        assert_eq!(again.filename, task.filename);
    }
}

#[test]
fn with_tags_keeps_intersecting_tasks_only() {
    let project = seeded();
    let store = project.store();
    let tags = tags_as_set("x");
    let titles: Vec<String> = store
        .tasks(ReadMode::MetadataOnly)
        .expect("tasks")
        .with_tags(&tags)
        .expect("filter")
        .map(|task| task.task.title)
        .collect();
    assert_eq!(titles, vec!["First".to_string()]);
}

#[test]
fn change_status_is_idempotent() {
    let project = seeded();
    let store = project.store();
    let name = "2022-02-01_09:00:00.000002";
    let task = store
        .task_by_filename(name, ReadMode::MetadataOnly)
        .expect("lookup");

    let first = store.change_status(&task, Status::Done).expect("first");
    let second = store.change_status(&first.task, Status::Done).expect("second");
    assert!(first.moved);
    assert!(!second.moved);

    assert!(project.task_exists(Status::Done, name));
    assert!(!project.task_exists(Status::Todo, name));
    assert_eq!(store.counts().expect("counts"), (1, 2));
}

#[test]
fn file_round_trip_keeps_header_and_title() {
    let project = TestProject::init();
    let tags = tags_as_set("Work, urgent ,work");
    let body = taskfile::serialize(Some("erin <e@example.com>"), &tags, "Ship release\nnotes here");
    let path = project.write_task(Status::Todo, "2022-02-01_09:00:00.000009", &body);

    let first = taskfile::parse(&path, Status::Todo, ReadMode::Full).expect("parse");
    let rewritten = taskfile::serialize(first.author.as_deref(), &first.tags, &first.text());
    std::fs::write(&path, rewritten).expect("rewrite");
    let second = taskfile::parse(&path, Status::Todo, ReadMode::Full).expect("reparse");

    assert_eq!(first.author, second.author);
    assert_eq!(first.tags, second.tags);
    assert_eq!(first.title, second.title);
    assert_eq!(second.content.as_deref(), Some("notes here"));
    assert_eq!(second.tags.render(), "work, urgent");
}

#[test]
fn loaded_snapshot_feeds_both_status_views() {
    let project = seeded();
    let store = project.store();
    let snapshot = store
        .tasks(ReadMode::MetadataOnly)
        .expect("tasks")
        .order_by("created".parse().expect("spec"))
        .load();

    let todo: Vec<String> = snapshot
        .set()
        .with_status(Status::Todo)
        .map(|t| t.task.title)
        .collect();
    let done: Vec<String> = snapshot
        .set()
        .with_status(Status::Done)
        .map(|t| t.task.title)
        .collect();
    assert_eq!(todo, vec!["First".to_string(), "Second".to_string()]);
    assert_eq!(done, vec!["Third".to_string()]);

    let all: Vec<String> = TaskSet::new(snapshot).map(|t| t.task.title).collect();
    assert_eq!(all.len(), 3);
}
