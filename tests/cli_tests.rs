//! CLI surface tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn hub(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hub").unwrap();
    cmd.env("HUB_DB_PATH", dir.path().join("hub.db"));
    cmd
}

fn init_and_seed(dir: &TempDir) {
    hub(dir).arg("init").assert().success();
    hub(dir).arg("seed").assert().success();
}

#[test]
fn init_creates_the_database() {
    let dir = TempDir::new().unwrap();
    hub(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("database ready"));
    assert!(dir.path().join("hub.db").exists());
}

#[test]
fn commands_refuse_to_run_before_init() {
    let dir = TempDir::new().unwrap();
    hub(&dir)
        .arg("browse")
        .assert()
        .failure()
        .stderr(predicate::str::contains("hub init"));
}

#[test]
fn browse_lists_seeded_records() {
    let dir = TempDir::new().unwrap();
    init_and_seed(&dir);

    hub(&dir)
        .arg("browse")
        .assert()
        .success()
        .stdout(predicate::str::contains("10 result(s)"))
        .stdout(predicate::str::contains("Campus Solar Transition"));
}

#[test]
fn browse_json_is_parseable() {
    let dir = TempDir::new().unwrap();
    init_and_seed(&dir);

    let output = hub(&dir)
        .args(["browse", "--json", "--kind", "green-fund"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["total"], 1);
    assert_eq!(doc["records"][0]["kind"], "green-fund");
}

#[test]
fn facet_arguments_narrow_the_listing() {
    let dir = TempDir::new().unwrap();
    init_and_seed(&dir);

    hub(&dir)
        .args(["browse", "--json", "--topic", "waste"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Annual Waste Diversion Report"));

    hub(&dir)
        .args(["browse", "--json", "-f", "topic=waste"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Annual Waste Diversion Report"));

    hub(&dir)
        .args(["browse", "-f", "topic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME=VALUE"));
}

#[test]
fn anonymous_browse_of_private_listing_fails() {
    let dir = TempDir::new().unwrap();
    init_and_seed(&dir);

    hub(&dir)
        .args(["browse", "--kind", "green-fund", "--audience", "anonymous"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("access denied"));
}

#[test]
fn choices_lists_facets_for_a_kind() {
    let dir = TempDir::new().unwrap();
    init_and_seed(&dir);

    hub(&dir)
        .args(["choices", "ownership", "--kind", "green-power-project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("institution-owned"));

    hub(&dir)
        .args(["choices", "no-such-facet"])
        .assert()
        .failure();
}

#[test]
fn reindex_reports_count() {
    let dir = TempDir::new().unwrap();
    init_and_seed(&dir);

    hub(&dir)
        .args(["reindex", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"indexed\": 11"));
}

#[test]
fn search_flag_finds_records() {
    let dir = TempDir::new().unwrap();
    init_and_seed(&dir);

    hub(&dir)
        .args(["browse", "--search", "turbine"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wind Turbine Campus Tour"))
        .stdout(predicate::str::contains("1 result(s)"));
}
