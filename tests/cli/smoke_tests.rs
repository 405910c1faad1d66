use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn shows_help() {
    Command::new(env!("CARGO_BIN_EXE_repo_lines"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("repo_lines"));
}

#[test]
fn lists_languages() {
    Command::new(env!("CARGO_BIN_EXE_repo_lines"))
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rust").and(predicate::str::contains("Objective-C++")));
}

#[test]
fn languages_as_json_array() {
    let output = Command::new(env!("CARGO_BIN_EXE_repo_lines"))
        .args(["languages", "--format", "json"])
        .output()
        .expect("run binary");
    assert!(output.status.success());
    let labels: Vec<String> = serde_json::from_slice(&output.stdout).expect("json array");
    assert!(labels.windows(2).all(|pair| pair[0] < pair[1]));
}
