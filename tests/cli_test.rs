use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;

const CHAPTER: &str = "# Chapter\n\n## A\n\n## B\n";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_preview_shows_final_line_numbers() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "doc.md", CHAPTER);

    let mut cmd = cargo_bin_cmd!("mdtoc");
    cmd.current_dir(dir.path())
        .args(["--no-config", "doc.md"])
        .assert()
        .success()
        .stdout("### Chapter\n\n- [A] `:10+2`\n- [B] `:12+1`\n");
}

#[test]
fn test_in_place_then_check() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "doc.md", CHAPTER);

    let mut cmd = cargo_bin_cmd!("mdtoc");
    cmd.current_dir(dir.path())
        .args(["--no-config", "-i", "doc.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TOC inserted"));

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("- [A](#a) `:10+2`"), "{written}");

    let mut check = cargo_bin_cmd!("mdtoc");
    check
        .current_dir(dir.path())
        .args(["--no-config", "--check", "doc.md"])
        .assert()
        .code(0);

    fs::write(&path, written.replace("## B", "## Renamed")).unwrap();
    let mut stale = cargo_bin_cmd!("mdtoc");
    stale
        .current_dir(dir.path())
        .args(["--no-config", "--check", "doc.md"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("TOC out of date"));
}

#[test]
fn test_global_open_marker() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "doc.md", "# Title\n<!--TOC-->\nContent");

    let mut cmd = cargo_bin_cmd!("mdtoc");
    cmd.current_dir(dir.path())
        .args(["--no-config", "-g", "--line-numbers=false", "-i", "doc.md"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# Title\n<!--TOC-->\n\n- [Title](#title)\n\n<!--TOC-->\nContent"
    );
}

#[test]
fn test_delete_restores_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "doc.md", CHAPTER);

    let mut insert = cargo_bin_cmd!("mdtoc");
    insert.current_dir(dir.path()).args(["--no-config", "-i", "doc.md"]).assert().success();
    assert_ne!(fs::read_to_string(&path).unwrap(), CHAPTER);

    let mut delete = cargo_bin_cmd!("mdtoc");
    delete
        .current_dir(dir.path())
        .args(["--no-config", "-d", "doc.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TOC removed"));
    assert_eq!(fs::read_to_string(&path).unwrap(), CHAPTER);
}

#[test]
fn test_invalid_levels_fail_before_touching_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "doc.md", CHAPTER);

    let mut cmd = cargo_bin_cmd!("mdtoc");
    cmd.current_dir(dir.path())
        .args(["--no-config", "-m", "4", "-M", "2", "-i", "doc.md"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be greater"));
    assert_eq!(fs::read_to_string(&path).unwrap(), CHAPTER);
}

#[test]
fn test_stray_marker_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let content = "# A\n<!--TOC-->\n\n## a\n\nKeep me.\n\n# B\n\n<!--TOC-->\n\n- [b](#b)\n\n<!--TOC-->\n\n## b\n";
    let path = write(dir.path(), "doc.md", content);

    for flag in ["-i", "-d", "--check"] {
        let mut cmd = cargo_bin_cmd!("mdtoc");
        cmd.current_dir(dir.path())
            .args(["--no-config", flag, "doc.md"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Stray TOC marker"))
            .stderr(predicate::str::contains("line 2"));
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_missing_file_does_not_stop_batch() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "doc.md", CHAPTER);

    let mut cmd = cargo_bin_cmd!("mdtoc");
    cmd.current_dir(dir.path())
        .args(["--no-config", "-i", "missing.md", "doc.md"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing.md"));
    assert!(fs::read_to_string(&path).unwrap().contains("<!--TOC-->"));
}

#[test]
fn test_marker_only_leaves_unmarked_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "doc.md", CHAPTER);

    let mut cmd = cargo_bin_cmd!("mdtoc");
    cmd.current_dir(dir.path())
        .args(["--no-config", "-i", "--marker-only", "doc.md"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
    assert_eq!(fs::read_to_string(&path).unwrap(), CHAPTER);
}

#[test]
fn test_paths_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let first = write(dir.path(), "one.md", CHAPTER);
    let second = write(dir.path(), "two.md", CHAPTER);

    let mut cmd = cargo_bin_cmd!("mdtoc");
    cmd.current_dir(dir.path())
        .args(["--no-config", "-i"])
        .write_stdin("one.md\n\ntwo.md\n")
        .assert()
        .success();

    assert!(fs::read_to_string(&first).unwrap().contains("<!--TOC-->"));
    assert!(fs::read_to_string(&second).unwrap().contains("<!--TOC-->"));
}

#[test]
fn test_no_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("mdtoc");
    cmd.current_dir(dir.path())
        .arg("--no-config")
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No input files"));
}

#[test]
fn test_directory_walk_and_batch_preview() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "docs/a.md", "# A\n\n## One\n");
    write(dir.path(), "docs/b.md", "# B\n\n## Two\n");
    write(dir.path(), "docs/plain.md", "No headings\n");
    write(dir.path(), "docs/notes.txt", "# Not markdown\n\n## Skip\n");

    let mut cmd = cargo_bin_cmd!("mdtoc");
    cmd.current_dir(dir.path())
        .args(["--no-config", "--line-numbers=false", "docs"])
        .assert()
        .success()
        .stdout("## docs/a.md\n\n### A\n\n- [One]\n\n## docs/b.md\n\n### B\n\n- [Two]\n");
}

#[test]
fn test_json_outline() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "doc.md", CHAPTER);

    let mut cmd = cargo_bin_cmd!("mdtoc");
    let output = cmd
        .current_dir(dir.path())
        .args(["--no-config", "--json", "doc.md"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();
    let headings = parsed[0]["headings"].as_array().unwrap();
    assert_eq!(parsed[0]["path"], "doc.md");
    assert_eq!(headings.len(), 3);
    assert_eq!(headings[1]["text"], "A");
    assert_eq!(headings[1]["anchor"], "a");
    assert_eq!(headings[1]["start_line"], 3);
    assert_eq!(headings[1]["end_line"], 4);
}

#[test]
fn test_config_file_discovered() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), ".mdtoc.toml", "global = true\nline-numbers = false\nanchor-links = true\n");
    write(dir.path(), "doc.md", "# Title\n\n## Part\n");

    let mut cmd = cargo_bin_cmd!("mdtoc");
    cmd.current_dir(dir.path())
        .arg("doc.md")
        .assert()
        .success()
        .stdout("- [Title](#title)\n  - [Part](#part)\n");
}

#[test]
fn test_cli_flags_override_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "custom.toml", "global = true\nline-numbers = false\nmin-level = 2\n");
    write(dir.path(), "doc.md", "# Title\n\n## Part\n\n### Sub\n");

    let mut cmd = cargo_bin_cmd!("mdtoc");
    cmd.current_dir(dir.path())
        .args(["--config", config.to_str().unwrap(), "-M", "2", "doc.md"])
        .assert()
        .success()
        .stdout("- [Part]\n");
}
