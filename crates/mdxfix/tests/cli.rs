use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn mdxfix(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mdxfix").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn fix_rewrites_docs_and_keeps_backup() {
    let temp = tempdir().unwrap();
    let docs = temp.path().join("docs");
    fs::create_dir_all(docs.join("api")).unwrap();

    let guide = "---\ntitle: {{x}}\n---\nUse {{version}} with <YOUR_API_KEY>.<br>\n\n```\n{{kept}}\n```\n";
    fs::write(docs.join("api/guide.md"), guide).unwrap();
    fs::write(docs.join("clean.mdx"), "# Nothing here\n").unwrap();

    mdxfix(temp.path())
        .arg("fix")
        .assert()
        .success()
        .stderr(predicate::str::contains("Files updated: 1/2"));

    assert_eq!(
        fs::read_to_string(docs.join("api/guide.md")).unwrap(),
        "---\ntitle: {{x}}\n---\nUse `{{version}}` with `<YOUR_API_KEY>`.<br />\n\n```\n{{kept}}\n```\n"
    );
    assert_eq!(
        fs::read_to_string(docs.join("api/guide.md.bak")).unwrap(),
        guide
    );
    assert!(!docs.join("clean.mdx.bak").exists());
}

#[test]
fn fix_without_backup() {
    let temp = tempdir().unwrap();
    let doc = temp.path().join("page.md");
    fs::write(&doc, "{name}\n").unwrap();

    mdxfix(temp.path())
        .args(["fix", "--no-backup", "page.md"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&doc).unwrap(), "`{name}`\n");
    assert!(!temp.path().join("page.md.bak").exists());
}

#[test]
fn check_fails_when_changes_needed() {
    let temp = tempdir().unwrap();
    let doc = temp.path().join("page.md");
    fs::write(&doc, "Pass {token}\n").unwrap();

    mdxfix(temp.path())
        .args(["check", "page.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 1 files need fixing"));

    assert_eq!(fs::read_to_string(&doc).unwrap(), "Pass {token}\n");
}

#[test]
fn check_passes_after_fix() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("page.md"), "Pass {token}\n").unwrap();

    mdxfix(temp.path()).args(["fix", "page.md"]).assert().success();

    mdxfix(temp.path())
        .args(["check", "page.md"])
        .assert()
        .success()
        .stderr(predicate::str::contains("up to date"));
}

#[test]
fn missing_file_is_skipped() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("real.md"), "<hr>\n").unwrap();

    mdxfix(temp.path())
        .args(["fix", "gone.md", "real.md"])
        .assert()
        .success()
        .stderr(predicate::str::contains("File not found: gone.md"));

    assert_eq!(
        fs::read_to_string(temp.path().join("real.md")).unwrap(),
        "<hr />\n"
    );
}

#[test]
fn json_report_on_stdout() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.md"), "{{a}}\n").unwrap();

    let output = mdxfix(temp.path())
        .args(["fix", "--format", "json", "a.md"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["changed"], 1);
    assert_eq!(report["files"][0]["outcome"], "changed");
}

#[test]
fn config_enables_generic_placeholders() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("mdxfix.toml"),
        "[rules]\nplaceholders = \"generic\"\n[output]\nbackup = false\n",
    )
    .unwrap();
    fs::write(temp.path().join("a.md"), "Send <client_id> in <em>bold</em>\n").unwrap();

    mdxfix(temp.path()).args(["fix", "a.md"]).assert().success();

    assert_eq!(
        fs::read_to_string(temp.path().join("a.md")).unwrap(),
        "Send `<client_id>` in <em>bold</em>\n"
    );
    assert!(!temp.path().join("a.md.bak").exists());
}

#[test]
fn missing_docs_dir_fails() {
    let temp = tempdir().unwrap();

    mdxfix(temp.path())
        .arg("fix")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Docs directory not found"));
}

#[test]
fn init_writes_config_once() {
    let temp = tempdir().unwrap();

    mdxfix(temp.path()).arg("init").assert().success();
    let written = fs::read_to_string(temp.path().join("mdxfix.toml")).unwrap();
    assert!(written.contains("placeholders = \"literal\""));

    fs::write(temp.path().join("mdxfix.toml"), "# mine\n").unwrap();
    mdxfix(temp.path())
        .arg("init")
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(
        fs::read_to_string(temp.path().join("mdxfix.toml")).unwrap(),
        "# mine\n"
    );
}

#[test]
fn overlapping_paths_are_fixed_once() {
    let temp = tempdir().unwrap();
    let docs = temp.path().join("docs");
    fs::create_dir(&docs).unwrap();
    fs::write(docs.join("a.md"), "Use {{version}}\n").unwrap();

    mdxfix(temp.path())
        .args(["fix", "--no-backup", "--parallel", "docs", "docs/a.md"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Files updated: 1/1"));

    assert_eq!(
        fs::read_to_string(docs.join("a.md")).unwrap(),
        "Use `{{version}}`\n"
    );
}

#[test]
fn no_parallel_overrides_config() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("mdxfix.toml"),
        "[output]\nbackup = false\nparallel = true\n",
    )
    .unwrap();
    fs::write(temp.path().join("a.md"), "{name}\n").unwrap();

    mdxfix(temp.path())
        .args(["--verbose", "check", "a.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing 1 files in parallel"));

    mdxfix(temp.path())
        .args(["--verbose", "fix", "--no-parallel", "a.md"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Processing 1 files"))
        .stderr(predicate::str::contains("in parallel").not());
}

#[test]
fn parallel_flags_conflict() {
    let temp = tempdir().unwrap();

    mdxfix(temp.path())
        .args(["fix", "--parallel", "--no-parallel", "a.md"])
        .assert()
        .failure();
}
