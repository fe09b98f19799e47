use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fat_framework() -> Command {
    Command::cargo_bin("fat-framework").unwrap()
}

#[test]
fn missing_required_flag_fails_before_touching_the_filesystem() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out");

    fat_framework()
        .args(["-user", "alice", "-project", "MyLib", "-output"])
        .arg(&output)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--framework"));

    assert!(!output.exists());
}

#[test]
fn empty_flag_is_rejected() {
    fat_framework()
        .args([
            "-user", "alice", "-project", "", "-framework", "MyLib", "-output", "out",
        ])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn missing_derived_data_is_a_lookup_error() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out");

    fat_framework()
        .args([
            "-user",
            "no-such-user-for-fat-framework-tests",
            "-project",
            "MyLib",
            "-framework",
            "MyLib",
            "-output",
        ])
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "error: Can't find Xcode derived data folder at /Users/no-such-user-for-fat-framework-tests/Library/Developer/Xcode/DerivedData",
        ));

    assert!(!output.exists());
}

#[test]
fn help_lists_flags() {
    fat_framework()
        .arg("-help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--user")
                .and(predicate::str::contains("--buildconfig"))
                .and(predicate::str::contains("[default: Release]")),
        );
}
