mod support;

use predicates::str::contains;
use serde_json::Value;

use support::TestProject;
use tdo::task::Status;

#[test]
fn commands_without_project_fail_with_hint() {
    let project = TestProject::empty();

    for args in [
        vec!["lst"],
        vec!["add", "something"],
        vec!["check", "1"],
        vec!["uncheck", "1"],
        vec!["show", "1"],
    ] {
        project
            .cmd()
            .args(&args)
            .assert()
            .failure()
            .code(2)
            .stderr(contains("No TASKS directory found"))
            .stderr(contains("hint: tdo init"));
    }
    assert!(!project.root().exists());
}

#[test]
fn check_unknown_task_changes_nothing() {
    let project = TestProject::init();
    let name = "2021-05-01_00:00:00.000000";
    project.write_task(Status::Todo, name, "Only task\n");

    for target in ["2", "0", "2030-01-01_00:00:00.000000", "nope"] {
        project
            .cmd()
            .args(["check", target])
            .assert()
            .failure()
            .code(2)
            .stderr(contains("No such task"));
    }
    assert!(project.task_exists(Status::Todo, name));
    assert!(!project.task_exists(Status::Done, name));
}

#[test]
fn check_malformed_filename_is_parse_error() {
    let project = TestProject::init();
    project.write_task(Status::Todo, "notes.txt", "not a task\n");

    project
        .cmd()
        .args(["check", "notes.txt"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Parse error"));
    assert!(project.task_exists(Status::Todo, "notes.txt"));
}

#[test]
fn json_errors_use_envelope() -> Result<(), Box<dyn std::error::Error>> {
    let project = TestProject::empty();
    let output = project.cmd().args(["--json", "lst"]).output()?;
    assert_eq!(output.status.code(), Some(2));

    let body: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(body["schema_version"], "tdo.v1");
    assert_eq!(body["command"], "lst");
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"]["kind"], "user_error");
    assert_eq!(body["error"]["code"], 2);
    assert!(body["error"]["message"]
        .as_str()
        .is_some_and(|msg| msg.contains("No TASKS directory")));
    assert!(body["error"]["details"]["start"].is_string());
    assert_eq!(body["next_steps"][0], "tdo init");
    Ok(())
}

#[test]
fn invalid_config_is_reported() {
    let project = TestProject::init();
    std::fs::write(project.root().join(".config"), "{ not json").expect("write config");

    project
        .cmd()
        .arg("lst")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Invalid configuration"));
}
