//! End-to-end tests for the `esedit` binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = "export default [
  {
    files: ['src/**/*.js'],
    rules: {
      'no-console': 'error',
    },
  },
];
";

fn esedit() -> Command {
    Command::cargo_bin("esedit").expect("esedit binary")
}

fn repo_with(files: &[(&str, &str)]) -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    for (path, contents) in files {
        let full = td.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, contents).unwrap();
    }
    td
}

fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path)).unwrap()
}

#[test]
fn test_rule_ensure_previews_a_diff_without_writing() {
    let temp = repo_with(&[("eslint.config.mjs", CONFIG)]);

    esedit()
        .current_dir(temp.path())
        .args(["rule", "ensure", "--files", "src/**/*.js"])
        .args(["--name", "no-debugger", "--value", "\"warn\""])
        .assert()
        .success()
        .stdout(predicate::str::contains("diff --git a/eslint.config.mjs"))
        .stdout(predicate::str::contains("+      'no-debugger': 'warn',"));

    assert_eq!(read(temp.path(), "eslint.config.mjs"), CONFIG);
}

#[test]
fn test_rule_ensure_with_write_edits_in_place() {
    let temp = repo_with(&[("eslint.config.mjs", CONFIG)]);

    esedit()
        .current_dir(temp.path())
        .arg("--write")
        .args(["rule", "ensure", "--files", "src/**/*.js"])
        .args(["--name", "max-depth", "--value", r#"["warn", {"max": 3}]"#])
        .assert()
        .success();

    assert_eq!(
        read(temp.path(), "eslint.config.mjs"),
        "export default [
  {
    files: ['src/**/*.js'],
    rules: {
      'no-console': 'error',
      'max-depth': ['warn', { 'max': 3 }],
    },
  },
];
"
    );

    // Second run has nothing to do.
    esedit()
        .current_dir(temp.path())
        .arg("--write")
        .args(["rule", "ensure", "--files", "src/**/*.js"])
        .args(["--name", "max-depth", "--value", r#"["warn", {"max": 3}]"#])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_config_file_sets_path_and_write() {
    let temp = repo_with(&[
        ("cfg/eslint.config.js", CONFIG),
        (
            "esedit.toml",
            "[eslint]\npath = \"cfg/eslint.config.js\"\n\n[apply]\nwrite = true\n",
        ),
    ]);

    esedit()
        .current_dir(temp.path())
        .args(["rule", "remove", "--files", "src/**/*.js", "--name", "no-console"])
        .assert()
        .success();

    let edited = read(temp.path(), "cfg/eslint.config.js");
    assert!(!edited.contains("no-console"));
    assert!(edited.contains("rules: {"));
}

#[test]
fn test_repo_root_and_config_flags() {
    let temp = repo_with(&[("web/lint.mjs", CONFIG)]);

    esedit()
        .args(["--repo-root", temp.path().to_str().unwrap(), "--write"])
        .args(["config", "copy", "--config", "web/lint.mjs"])
        .args(["--from", "src/**/*.js", "--to", "test/**/*.js"])
        .assert()
        .success();

    let edited = read(temp.path(), "web/lint.mjs");
    assert!(edited.ends_with(
        "  { 'files': ['test/**/*.js'], 'rules': { 'no-console': 'error' } },\n];\n"
    ));
}

#[test]
fn test_config_list_prints_entries_as_json() {
    let temp = repo_with(&[("eslint.config.mjs", CONFIG)]);

    esedit()
        .current_dir(temp.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""files": ["#))
        .stdout(predicate::str::contains(r#""no-console": "error""#));
}

#[test]
fn test_missing_default_export_exits_with_block_code() {
    let temp = repo_with(&[("eslint.config.mjs", "module.exports = {};\n")]);

    esedit()
        .current_dir(temp.path())
        .args(["rule", "add", "--files", "a.js", "--name", "x", "--value", "1"])
        .assert()
        .code(2);
}

#[test]
fn test_spread_on_missing_entry_exits_with_block_code() {
    let temp = repo_with(&[("eslint.config.mjs", CONFIG)]);

    esedit()
        .current_dir(temp.path())
        .args(["spread", "add", "--files", "lib/**/*.js", "--expr", "shared.rules"])
        .assert()
        .code(2);
}

#[test]
fn test_spread_add_to_config_members() {
    let temp = repo_with(&[("eslint.config.mjs", CONFIG)]);

    esedit()
        .current_dir(temp.path())
        .args(["--write", "spread", "add", "--files", "src/**/*.js"])
        .args(["--target", "config", "--expr", "shared"])
        .assert()
        .success();

    assert!(read(temp.path(), "eslint.config.mjs").contains("    },\n    ...shared,\n  },"));
}

#[test]
fn test_invalid_json_value_is_a_runtime_error() {
    let temp = repo_with(&[("eslint.config.mjs", CONFIG)]);

    esedit()
        .current_dir(temp.path())
        .args(["rule", "add", "--files", "src/**/*.js", "--name", "x", "--value", "warn"])
        .assert()
        .code(1);
}

#[test]
fn test_import_ensure_has_and_list() {
    let temp = repo_with(&[("src/index.js", "import { a } from './lib.js';\n\na();\n")]);

    esedit()
        .current_dir(temp.path())
        .args(["--write", "import", "ensure", "--file", "src/index.js"])
        .args(["--module", "./lib.js", "--name", "b"])
        .assert()
        .success();
    assert_eq!(
        read(temp.path(), "src/index.js"),
        "import { a, b } from './lib.js';\n\na();\n"
    );

    esedit()
        .current_dir(temp.path())
        .args(["import", "has", "--file", "src/index.js"])
        .args(["--module", "./lib.js", "--name", "b", "--kind", "named"])
        .assert()
        .success()
        .stdout("true\n");

    esedit()
        .current_dir(temp.path())
        .args(["import", "list", "--file", "src/index.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""module": "./lib.js""#));
}

#[test]
fn test_import_statement_and_alias() {
    let temp = repo_with(&[("main.js", "run();\n")]);

    esedit()
        .current_dir(temp.path())
        .args(["--write", "import", "statement", "--file", "main.js"])
        .args(["--text", "import run from \"./run.js\""])
        .assert()
        .success();
    esedit()
        .current_dir(temp.path())
        .args(["--write", "import", "ensure", "--file", "main.js"])
        .args(["--module", "node:path", "--name", "join", "--alias", "joinPath"])
        .assert()
        .success();

    assert_eq!(
        read(temp.path(), "main.js"),
        "import run from './run.js';\nimport { join as joinPath } from 'node:path';\nrun();\n"
    );
}

#[test]
fn test_import_alias_requires_named_kind() {
    let temp = repo_with(&[("main.js", "")]);

    esedit()
        .current_dir(temp.path())
        .args(["import", "ensure", "--file", "main.js", "--module", "m"])
        .args(["--name", "m", "--kind", "default", "--alias", "x"])
        .assert()
        .code(1);
}

#[test]
fn test_unknown_import_kind_is_rejected() {
    esedit()
        .args(["import", "has", "--file", "a.js", "--module", "m", "--kind", "star"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown import kind"));
}
