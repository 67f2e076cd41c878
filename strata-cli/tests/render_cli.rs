use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG_MAP: &str = r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: {{ ConfigName }}
  labels:
    {% include "labels.tpl" %}
data:
  size: {{ Values.size | quote }}
"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

fn workspace() -> TempDir {
    let root = TempDir::new().expect("root");
    let p = root.path();
    write(p, "envs/prod.yaml", "values:\n  size: medium\n");
    write(p, "clusters/east.yaml", "values:\n  size: small\n");
    write(p, "helpers/labels.tpl", "app: {{ AppName }}");
    write(p, "apps/shop/_web.yaml", "namespace: ns\nclusters: [east]\nenv: prod\n");
    write(p, "apps/shop/cm.yaml", CONFIG_MAP);
    root
}

fn strata(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("strata").expect("strata binary");
    cmd.current_dir(root).env_remove("RUST_LOG");
    cmd
}

fn output_file(root: &Path) -> PathBuf {
    root.join("out/east/ns/shop/cm.yaml")
}

#[test]
fn render_writes_then_reports_unchanged() {
    let ws = workspace();

    strata(ws.path())
        .args(["render", "apps/shop", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ 'shop' rendered (1 written, 0 unchanged)"));

    let content = fs::read_to_string(output_file(ws.path())).expect("output");
    assert!(content.contains("size: \"medium\""), "env overlay wins: {content}");
    assert!(content.contains("app: shop"));

    strata(ws.path())
        .args(["render", "apps/shop", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(0 written, 1 unchanged)"));
}

#[test]
fn dry_run_writes_nothing() {
    let ws = workspace();

    strata(ws.path())
        .args(["render", "apps/shop", "out", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run] ✓ 'shop' rendered (1 would write, 0 unchanged)"))
        .stdout(predicate::str::contains("cm.yaml"));

    assert!(!ws.path().join("out").exists());
}

#[test]
fn diff_shows_pending_change_only() {
    let ws = workspace();
    strata(ws.path())
        .args(["render", "apps/shop", "out"])
        .assert()
        .success();

    strata(ws.path())
        .args(["diff", "apps/shop", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No differences for 'shop'."));

    write(ws.path(), "envs/prod.yaml", "values:\n  size: large\n");
    strata(ws.path())
        .args(["diff", "apps/shop", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- a/east/ns/shop/cm.yaml"))
        .stdout(predicate::str::contains("+  size: \"large\""));

    let content = fs::read_to_string(output_file(ws.path())).expect("output");
    assert!(content.contains("medium"), "diff must not write");
}

#[test]
fn missing_overlay_directory_fails() {
    let ws = workspace();
    fs::remove_dir_all(ws.path().join("clusters")).expect("remove clusters");

    strata(ws.path())
        .args(["render", "apps/shop", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to create generator"));
}

#[test]
fn custom_overlay_locations_are_honoured() {
    let ws = workspace();
    fs::rename(ws.path().join("envs"), ws.path().join("environments")).expect("rename");

    strata(ws.path())
        .args(["render", "apps/shop", "out", "--envs", "environments"])
        .assert()
        .success();
    assert!(output_file(ws.path()).exists());
}

#[test]
fn recurse_with_keep_going_renders_healthy_apps() {
    let ws = workspace();
    write(ws.path(), "apps/broken/_api.yaml", "namespace: ns\nclusters: [north]\n");
    write(ws.path(), "apps/broken/cm.yaml", CONFIG_MAP);

    strata(ws.path())
        .args(["render", "apps", "out", "-r", "--keep-going"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗"))
        .stderr(predicate::str::contains("1 directory failed"));

    assert!(output_file(ws.path()).exists(), "shop still rendered");
    assert!(!ws.path().join("out/north").exists());
}

#[test]
fn recurse_without_keep_going_stops_at_first_failure() {
    let ws = workspace();
    write(ws.path(), "apps/aaa/_api.yaml", "namespace: ns\nclusters: [north]\n");

    strata(ws.path())
        .args(["render", "apps", "out", "--recurse"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("apps/aaa"));

    assert!(!output_file(ws.path()).exists(), "later directories are not processed");
}

#[test]
fn recurse_over_missing_input_reports_read_failure() {
    let ws = workspace();

    strata(ws.path())
        .args(["render", "no-such-dir", "out", "-r"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read directory no-such-dir"));
}
