//! End-to-end tests for the memo binary
//!
//! Each test runs in its own temp directory with MEMO_HOME pointed
//! inside it, so nothing leaks into the user's real notebook.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use memo::Memo;

fn memo_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("memo").unwrap();
    cmd.current_dir(dir.path());
    cmd.env("MEMO_HOME", dir.path().join("memo-home"));
    cmd.env("HOME", dir.path());
    cmd.env("NO_COLOR", "1");
    cmd
}

fn init_notebook(dir: &TempDir) {
    memo_cmd(dir).arg("init").assert().success();
}

fn add_memo(dir: &TempDir, title: &str, content: &str) {
    memo_cmd(dir)
        .args(["add", title, content])
        .assert()
        .success();
}

fn list_json(dir: &TempDir) -> Vec<Memo> {
    let output = memo_cmd(dir)
        .args(["list", "--json"])
        .output()
        .expect("list --json");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("valid memo JSON")
}

#[test]
fn init_creates_notebook() {
    let dir = TempDir::new().unwrap();

    memo_cmd(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized memo notebook"));

    assert!(dir.path().join(".memo/config.toml").exists());
    assert!(dir.path().join(".memo/memos.db").exists());
}

#[test]
fn commands_require_an_initialized_notebook() {
    let dir = TempDir::new().unwrap();

    memo_cmd(&dir)
        .args(["add", "Title", "content"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("memo init"));
}

#[test]
fn add_then_list_shows_the_memo() {
    let dir = TempDir::new().unwrap();
    init_notebook(&dir);
    add_memo(&dir, "Groceries", "- milk\n- eggs");

    memo_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"));
}

#[test]
fn add_reads_content_from_stdin() {
    let dir = TempDir::new().unwrap();
    init_notebook(&dir);

    memo_cmd(&dir)
        .args(["add", "Piped", "--file", "-"])
        .write_stdin("piped body text\n")
        .assert()
        .success();

    let memos = list_json(&dir);
    assert_eq!(memos[0].content, "piped body text\n");
}

#[test]
fn unknown_category_falls_back_to_other() {
    let dir = TempDir::new().unwrap();
    init_notebook(&dir);

    memo_cmd(&dir)
        .args(["add", "Odd one", "content", "--category", "groceries"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown category"));

    let memos = list_json(&dir);
    assert_eq!(memos.len(), 1);
    assert_eq!(memos[0].category.as_str(), "other");
}

#[test]
fn show_raw_prints_the_content() {
    let dir = TempDir::new().unwrap();
    init_notebook(&dir);
    add_memo(&dir, "Plain", "just one plain line");

    let id = list_json(&dir)[0].short_id();
    memo_cmd(&dir)
        .args(["show", &id, "--raw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("just one plain line"));
}

#[test]
fn show_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    init_notebook(&dir);

    memo_cmd(&dir)
        .args(["show", "zzzz9999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No memo found"));
}

#[test]
fn offline_summarize_extracts_first_sentence() {
    let dir = TempDir::new().unwrap();
    init_notebook(&dir);
    add_memo(
        &dir,
        "Sentences",
        "First sentence here. Second sentence follows.",
    );

    let id = list_json(&dir)[0].short_id();
    memo_cmd(&dir)
        .args(["summarize", &id, "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First sentence here."));

    // Without --force the stored summary is kept
    memo_cmd(&dir)
        .args(["summarize", &id])
        .assert()
        .success()
        .stderr(predicate::str::contains("Already summarized"));

    let memos = list_json(&dir);
    assert_eq!(memos[0].summary.as_deref(), Some("First sentence here."));
}

#[test]
fn rm_force_deletes_the_memo() {
    let dir = TempDir::new().unwrap();
    init_notebook(&dir);
    add_memo(&dir, "Doomed", "to be removed");

    let id = list_json(&dir)[0].short_id();
    memo_cmd(&dir)
        .args(["rm", &id, "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted memo"));

    memo_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No memos found"));
}

#[test]
fn search_matches_content_words() {
    let dir = TempDir::new().unwrap();
    init_notebook(&dir);
    add_memo(&dir, "Groceries", "buy milk and eggs");
    add_memo(&dir, "Workout", "run five kilometers");

    memo_cmd(&dir)
        .args(["search", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Workout").not());
}

#[test]
fn theme_set_persists_the_preference() {
    let dir = TempDir::new().unwrap();

    memo_cmd(&dir)
        .args(["theme", "set", "dark"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme set to dark"));

    let prefs = std::fs::read_to_string(dir.path().join("memo-home/prefs.toml")).unwrap();
    assert!(prefs.contains("theme = \"dark\""));
}

#[test]
fn theme_rejects_unknown_names() {
    let dir = TempDir::new().unwrap();

    memo_cmd(&dir)
        .args(["theme", "set", "solarized"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown theme"));
}

#[test]
fn edit_with_flags_updates_fields() {
    let dir = TempDir::new().unwrap();
    init_notebook(&dir);
    add_memo(&dir, "Before", "old content");

    let id = list_json(&dir)[0].short_id();
    memo_cmd(&dir)
        .args(["edit", &id, "--title", "After", "--tags", "a,b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated memo"));

    let memos = list_json(&dir);
    assert_eq!(memos[0].title, "After");
    assert_eq!(memos[0].tags, vec!["a", "b"]);
    assert_eq!(memos[0].content, "old content");
}

#[test]
fn list_filters_by_category() {
    let dir = TempDir::new().unwrap();
    init_notebook(&dir);

    memo_cmd(&dir)
        .args(["add", "Work note", "standup notes", "--category", "work"])
        .assert()
        .success();
    add_memo(&dir, "Default note", "anything");

    memo_cmd(&dir)
        .args(["list", "--category", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work note"))
        .stdout(predicate::str::contains("Default note").not());

    memo_cmd(&dir)
        .args(["list", "--category", "nonsense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
}
