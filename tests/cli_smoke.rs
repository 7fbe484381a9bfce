use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn tdo_help_works() {
    Command::cargo_bin("tdo")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("VCS friendly task tracker"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = ["init", "add", "lst", "check", "uncheck", "show"];

    for cmd in subcommands {
        Command::cargo_bin("tdo")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}
