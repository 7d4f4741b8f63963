//! Integration tests for the `dauc` binary

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn case_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/three_unit.json")
}

#[test]
fn test_fixture_matches_shared_case() {
    let loaded = dauc_io::load_case(case_path()).unwrap();
    assert_eq!(loaded, dauc_algo::test_utils::three_unit_case());
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = cargo_bin_cmd!("dauc");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("uc"))
        .stdout(predicate::str::contains("socp"));
}

#[test]
fn test_uc_solve_help() {
    let mut cmd = cargo_bin_cmd!("dauc");
    cmd.args(["uc", "solve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--milp-solver"))
        .stdout(predicate::str::contains("--threads"));
}

#[test]
fn test_uc_validate() {
    let mut cmd = cargo_bin_cmd!("dauc");
    cmd.args(["uc", "validate"])
        .arg(case_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("3 generators"))
        .stdout(predicate::str::contains("OK (0 warnings)"));
}

#[test]
fn test_uc_validate_rejects_broken_case() {
    let dir = tempdir().unwrap();
    let mut case = dauc_algo::test_utils::three_unit_case();
    case.system.reserve_mw.pop();
    let path = dir.path().join("broken.json");
    dauc_io::save_case(&case, &path).unwrap();

    let mut cmd = cargo_bin_cmd!("dauc");
    cmd.args(["uc", "validate"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("INVALID"));
}

#[test]
fn test_uc_solve_writes_solution() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out/uc.json");
    let lp = dir.path().join("uc.lp");

    let mut cmd = cargo_bin_cmd!("dauc");
    cmd.args(["uc", "solve"])
        .arg(case_path())
        .arg("--out")
        .arg(&out)
        .arg("--lp")
        .arg(&lp)
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: optimal"))
        .stdout(predicate::str::contains("TOTAL"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["status"], "optimal");
    assert_eq!(json["schedules"].as_array().unwrap().len(), 3);

    let text = std::fs::read_to_string(&lp).unwrap();
    assert!(text.contains("Binaries"));
    assert!(text.contains(" balance_1: "));
}

#[test]
fn test_uc_solve_json_relaxed() {
    let mut cmd = cargo_bin_cmd!("dauc");
    cmd.args(["uc", "solve", "--format", "json", "--milp-solver", "relax"])
        .arg(case_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"exact\": false"));
}

#[test]
fn test_uc_solve_unknown_solver() {
    let mut cmd = cargo_bin_cmd!("dauc");
    cmd.args(["uc", "solve", "--milp-solver", "cplex"])
        .arg(case_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("supported values"));
}

#[test]
fn test_uc_build_writes_lp() {
    let dir = tempdir().unwrap();
    let lp = dir.path().join("model.lp");
    let mut cmd = cargo_bin_cmd!("dauc");
    cmd.args(["uc", "build"])
        .arg(case_path())
        .arg("--lp")
        .arg(&lp)
        .assert()
        .success()
        .stdout(predicate::str::contains("36 binary"))
        .stdout(predicate::str::contains("minon"));
    assert!(std::fs::read_to_string(&lp).unwrap().ends_with("End\n"));
}

#[test]
fn test_uc_missing_case_file() {
    let mut cmd = cargo_bin_cmd!("dauc");
    cmd.args(["uc", "solve", "/nonexistent/case.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading case file"));
}

#[test]
fn test_socp_duality() {
    let dir = tempdir().unwrap();
    let lp = dir.path().join("dual.lp");
    let report = dir.path().join("duality.json");
    let mut cmd = cargo_bin_cmd!("dauc");
    cmd.args(["socp", "duality", "--lp"])
        .arg(&lp)
        .arg("--out")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Strong duality:   holds"));

    let text = std::fs::read_to_string(&lp).unwrap();
    assert!(text.contains(" CONE: [ - 2 z0 * z1 + z2 ^2 + z3 ^2 ] <= 0"));
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["strong_holds"], true);
}

#[test]
fn test_config_file_output_dir() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("dauc.toml");
    let results = dir.path().join("results");
    std::fs::write(
        &config,
        format!(
            "[solver]\nthreads = \"auto\"\n\n[output]\ndir = {:?}\ncommitment_table = false\n",
            results.display().to_string()
        ),
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("dauc");
    cmd.arg("--config")
        .arg(&config)
        .args(["uc", "solve"])
        .arg(case_path())
        .args(["--out", "uc.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL").not());
    assert!(results.join("uc.json").exists());
}
