//! Integration tests for the streamlogic binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const KITCHEN: &str = "
; raw values appear directly in the facts
(define (problem kitchen)
  (:domain pick-and-place)
  (:init
    (Conf (0 0.5))
    (AtConf (0 0.5))
    (HandEmpty))
  (:goal (and (Holding cup))))
";

fn streamlogic() -> Command {
    let mut cmd = Command::cargo_bin("streamlogic").unwrap();
    cmd.args(["--no-config", "--no-color"]);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn render_with_objects(dir: &TempDir) -> std::path::PathBuf {
    let problem = write(dir, "kitchen.pddl", KITCHEN);
    let objects = dir.path().join("objects.json");
    streamlogic()
        .arg("render")
        .arg(&problem)
        .arg("--objects")
        .arg(&objects)
        .assert()
        .success();
    objects
}

#[test]
fn test_render_to_stdout() {
    let dir = TempDir::new().unwrap();
    let problem = write(&dir, "kitchen.pddl", KITCHEN);

    streamlogic()
        .arg("render")
        .arg(&problem)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("(define (problem kitchen)"))
        .stdout(predicate::str::contains("(:domain pick-and-place)"))
        .stdout(predicate::str::contains("(:objects v0 v1)"))
        .stdout(predicate::str::contains("(conf v0)"))
        .stdout(predicate::str::contains("(handempty)"))
        .stdout(predicate::str::contains("(:goal (and (holding v1)))"));
}

#[test]
fn test_render_name_override_and_output_file() {
    let dir = TempDir::new().unwrap();
    let problem = write(&dir, "kitchen.pddl", KITCHEN);
    let out = dir.path().join("out.pddl");

    streamlogic()
        .arg("render")
        .arg(&problem)
        .args(["--name", "dinner", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let rendered = fs::read_to_string(&out).unwrap();
    assert!(rendered.starts_with("(define (problem dinner)"));
}

#[test]
fn test_render_writes_object_table() {
    let dir = TempDir::new().unwrap();
    let objects = render_with_objects(&dir);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(objects).unwrap()).unwrap();
    assert_eq!(json["objects"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["config"]["object_prefix"], "v");
}

#[test]
fn test_decode_plan_text() {
    let dir = TempDir::new().unwrap();
    let objects = render_with_objects(&dir);
    let plan = write(&dir, "plan.txt", "(pick v1 v0)\n; cost = 2 (unit cost)\n");

    streamlogic()
        .arg("decode")
        .arg(&plan)
        .arg("--objects")
        .arg(&objects)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. (pick cup (0 0.5))"))
        .stdout(predicate::str::contains("Cost: 2"));
}

#[test]
fn test_decode_plan_json() {
    let dir = TempDir::new().unwrap();
    let objects = render_with_objects(&dir);
    let plan = write(&dir, "plan.txt", "(pick v1 v0)\n(place v1)\n");

    let output = streamlogic()
        .arg("decode")
        .arg(&plan)
        .arg("--objects")
        .arg(&objects)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["plan"].as_array().map(Vec::len), Some(2));
    assert_eq!(report["plan"][1]["action"], "place");
    assert!(report["cost"].is_null());
}

#[test]
fn test_infinity_symbols_survive_object_table() {
    let dir = TempDir::new().unwrap();
    let problem = write(
        &dir,
        "bounds.pddl",
        "(define (:domain d) (:init (limit -inf +inf)) (:goal (and (limit -inf +inf))))",
    );
    let objects = dir.path().join("objects.json");
    streamlogic()
        .arg("render")
        .arg(&problem)
        .arg("--objects")
        .arg(&objects)
        .assert()
        .success();
    assert!(!fs::read_to_string(&objects).unwrap().contains("null"));

    let plan = write(&dir, "plan.txt", "(widen v0 v1)\n");
    streamlogic()
        .arg("decode")
        .arg(&plan)
        .arg("--objects")
        .arg(&objects)
        .assert()
        .success()
        .stdout(predicate::str::contains("(widen -inf +inf)"));
}

#[test]
fn test_decode_unknown_name_fails() {
    let dir = TempDir::new().unwrap();
    let objects = render_with_objects(&dir);
    let plan = write(&dir, "plan.txt", "(pick v7)\n");

    streamlogic()
        .arg("decode")
        .arg(&plan)
        .arg("--objects")
        .arg(&objects)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("v7"));
}

#[test]
fn test_render_rejects_disjunctive_goal() {
    let dir = TempDir::new().unwrap();
    let problem = write(
        &dir,
        "bad.pddl",
        "(define (:domain d) (:init (p a)) (:goal (or (p a) (p b))))",
    );

    streamlogic()
        .arg("render")
        .arg(&problem)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to convert problem"));
}

#[test]
fn test_render_missing_file() {
    streamlogic()
        .args(["render", "does-not-exist.pddl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read problem file"));
}

#[test]
fn test_session_prefix_from_config() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "streamlogic.toml", "[session]\nobject_prefix = \"obj\"\n");
    let problem = write(&dir, "kitchen.pddl", KITCHEN);

    Command::cargo_bin("streamlogic")
        .unwrap()
        .env("STREAMLOGIC_CONFIG", &config)
        .args(["--no-color", "render"])
        .arg(&problem)
        .assert()
        .success()
        .stdout(predicate::str::contains("(:objects obj0 obj1)"));
}

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rc.toml");

    Command::cargo_bin("streamlogic")
        .unwrap()
        .env("STREAMLOGIC_CONFIG", &path)
        .args(["--no-color", "config", "init"])
        .assert()
        .success();
    assert!(Path::new(&path).exists());

    Command::cargo_bin("streamlogic")
        .unwrap()
        .env("STREAMLOGIC_CONFIG", &path)
        .args(["--no-color", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[session]"))
        .stdout(predicate::str::contains("object_prefix = \"v\""));

    Command::cargo_bin("streamlogic")
        .unwrap()
        .env("STREAMLOGIC_CONFIG", &path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rc.toml"));
}
