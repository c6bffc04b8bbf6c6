use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_todolite"))
}

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("data").join("todolite.db")
}

fn run_cmd_with_env(
    db: Option<&Path>,
    envs: &[(&str, &str)],
    args: &[&str],
    input: Option<&str>,
) -> Output {
    let mut cmd = Command::new(bin_path());
    cmd.env_remove("TODOLITE_DB").env_remove("RUST_LOG");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    if let Some(db) = db {
        cmd.arg("--db").arg(db);
    }
    cmd.args(args);
    if input.is_some() {
        cmd.stdin(Stdio::piped());
    }
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = cmd.spawn().expect("spawn command");
    if let Some(input) = input {
        child
            .stdin
            .as_mut()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("write stdin");
    }
    child.wait_with_output().expect("wait output")
}

fn run_cmd(dir: &TempDir, args: &[&str]) -> Output {
    run_cmd_with_env(Some(&db_path(dir)), &[], args, None)
}

fn output_stdout(output: Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout utf8")
}

fn parse_item_id(stdout: &str) -> i64 {
    let prefix = "Added item ID: ";
    let line = stdout.lines().next().expect("first line");
    line.strip_prefix(prefix)
        .expect("add output")
        .trim()
        .parse()
        .expect("item id parse")
}

fn add_item(dir: &TempDir, text: &str) -> i64 {
    parse_item_id(&output_stdout(run_cmd(dir, &["add", text])))
}

fn list_json(dir: &TempDir, status: &str) -> Vec<Value> {
    let stdout = output_stdout(run_cmd(dir, &["list", "--status", status, "--json"]));
    let value: Value = serde_json::from_str(&stdout).expect("json");
    value.as_array().expect("array").clone()
}

#[test]
fn init_creates_database_file() {
    let dir = TempDir::new().expect("temp dir");
    let stdout = output_stdout(run_cmd(&dir, &["init"]));
    assert_eq!(stdout.trim(), "Item store ready.");
    assert!(db_path(&dir).exists());

    let stdout = output_stdout(run_cmd(&dir, &["init"]));
    assert_eq!(stdout.trim(), "Item store ready.");
}

#[test]
fn empty_store_shows_no_sections() {
    let dir = TempDir::new().expect("temp dir");
    let stdout = output_stdout(run_cmd(&dir, &["show"]));
    assert_eq!(stdout.trim(), "No items.");
    assert!(!stdout.contains("Pending:"));
    assert!(!stdout.contains("Completed:"));
}

#[test]
fn add_prints_id_and_pending_section() {
    let dir = TempDir::new().expect("temp dir");
    let stdout = output_stdout(run_cmd(&dir, &["add", "buy milk"]));
    assert_eq!(
        stdout.trim(),
        "Added item ID: 1\nPending:\n- [ ] buy milk (id 1)"
    );
}

#[test]
fn add_rejects_empty_text() {
    let dir = TempDir::new().expect("temp dir");
    add_item(&dir, "buy milk");

    let output = run_cmd(&dir, &["add", ""]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid input: item text cannot be empty"),
        "stderr: {stderr}"
    );
    assert!(output.stdout.is_empty());
    assert_eq!(list_json(&dir, "all").len(), 1);
}

#[test]
fn done_moves_item_to_completed_section() {
    let dir = TempDir::new().expect("temp dir");
    let id = add_item(&dir, "buy milk");

    let stdout = output_stdout(run_cmd(&dir, &["done", &id.to_string()]));
    assert_eq!(
        stdout.trim(),
        format!("Item ID: {id} marked done.\nCompleted:\n- [x] buy milk (id {id})")
    );
    assert!(list_json(&dir, "pending").is_empty());
    let done = list_json(&dir, "done");
    assert_eq!(done.len(), 1);
    assert_eq!(done[0]["id"], id);
    assert_eq!(done[0]["done"], true);
    assert_eq!(done[0]["value"], "buy milk");
}

#[test]
fn remove_deletes_from_either_section() {
    let dir = TempDir::new().expect("temp dir");
    let pending = add_item(&dir, "pending");
    let done = add_item(&dir, "done");
    output_stdout(run_cmd(&dir, &["done", &done.to_string()]));

    let stdout = output_stdout(run_cmd(&dir, &["remove", &pending.to_string()]));
    assert!(stdout.starts_with(&format!("Item ID: {pending} removed.")));
    let stdout = output_stdout(run_cmd(&dir, &["remove", &done.to_string()]));
    assert_eq!(
        stdout.trim(),
        format!("Item ID: {done} removed.\nNo items.")
    );
}

#[test]
fn missing_ids_are_not_errors() {
    let dir = TempDir::new().expect("temp dir");
    add_item(&dir, "keep");

    let stdout = output_stdout(run_cmd(&dir, &["done", "999"]));
    assert!(stdout.starts_with("No pending item with ID: 999."));
    let stdout = output_stdout(run_cmd(&dir, &["remove", "999"]));
    assert!(stdout.starts_with("No item with ID: 999."));
    assert_eq!(list_json(&dir, "pending").len(), 1);
}

#[test]
fn ids_increase_across_invocations() {
    let dir = TempDir::new().expect("temp dir");
    let first = add_item(&dir, "buy milk");
    output_stdout(run_cmd(&dir, &["remove", &first.to_string()]));

    let a = add_item(&dir, "a");
    let b = add_item(&dir, "b");
    assert_eq!((a, b), (2, 3));
}

#[test]
fn list_prints_lines_in_id_order() {
    let dir = TempDir::new().expect("temp dir");
    add_item(&dir, "one");
    let two = add_item(&dir, "two");
    add_item(&dir, "three");
    output_stdout(run_cmd(&dir, &["done", &two.to_string()]));

    let stdout = output_stdout(run_cmd(&dir, &["list"]));
    assert_eq!(
        stdout.trim(),
        "- [ ] one (id 1)\n- [x] two (id 2)\n- [ ] three (id 3)"
    );
    let stdout = output_stdout(run_cmd(&dir, &["list", "--status", "done"]));
    assert_eq!(stdout.trim(), "- [x] two (id 2)");
}

#[test]
fn database_path_comes_from_env() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("from-env.db");
    let path_str = path.to_str().expect("utf8 path");
    let output = run_cmd_with_env(None, &[("TODOLITE_DB", path_str)], &["add", "env"], None);
    output_stdout(output);
    assert!(path.exists());
}

#[test]
fn shell_session_persists_changes() {
    let dir = TempDir::new().expect("temp dir");
    let db = db_path(&dir);
    let output = run_cmd_with_env(
        Some(&db),
        &[],
        &["shell"],
        Some("add \"buy milk\"\nadd eggs\ndone 1\nadd\nquit\n"),
    );
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let stdout = output_stdout(output);
    assert!(stdout.contains("Added item ID: 2"));
    assert!(stderr.contains("Nothing added"));

    let stdout = output_stdout(run_cmd(&dir, &["show"]));
    assert_eq!(
        stdout.trim(),
        "Pending:\n- [ ] eggs (id 2)\n\nCompleted:\n- [x] buy milk (id 1)"
    );
}

#[test]
fn memory_store_keeps_nothing_between_runs() {
    let dir = TempDir::new().expect("temp dir");
    let output = run_cmd_with_env(
        Some(&db_path(&dir)),
        &[],
        &["--store", "memory", "shell"],
        Some("add one\nadd two\nremove 1\n"),
    );
    let stdout = output_stdout(output);
    assert!(stdout.trim_end().ends_with("Pending:\n- [ ] two (id 2)"));
    assert!(!db_path(&dir).exists());

    let output = run_cmd_with_env(None, &[], &["--store", "memory", "show"], None);
    assert_eq!(output_stdout(output).trim(), "No items.");
}
