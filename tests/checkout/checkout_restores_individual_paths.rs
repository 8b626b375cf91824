use crate::checkout::checkout_detaches_head_on_a_digest::two_commit_history;
use crate::common::command::run_grit_command;
use assert_fs::fixture::{FileWriteStr, PathChild};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

#[test]
fn checkout_restores_a_modified_path() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let (_, second) = two_commit_history(&dir);

    dir.child("a.txt").write_str("scribbled over\n")?;

    run_grit_command(dir.path(), &["checkout", "HEAD", "--", "a.txt"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("a.txt"))?,
        "second a\n"
    );

    // HEAD did not move
    let head = std::fs::read_to_string(dir.path().join(".git/HEAD"))?;
    assert_eq!(head, "ref: refs/heads/master\n");
    let master = std::fs::read_to_string(dir.path().join(".git/refs/heads/master"))?;
    assert_eq!(master.trim(), second);

    Ok(())
}

#[test]
fn checkout_removes_paths_absent_from_the_commit() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    two_commit_history(&dir);

    // b.txt exists in HEAD but not in HEAD~1: restoring it from there
    // removes it from the working tree and the index
    run_grit_command(dir.path(), &["checkout", "HEAD~1", "--", "b.txt"])
        .assert()
        .success();

    assert!(!dir.path().join("b.txt").exists());

    run_grit_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes to be committed:"))
        .stdout(predicate::str::contains("deleted:"))
        .stdout(predicate::str::contains("b.txt"));

    Ok(())
}

#[test]
fn restored_paths_renormalize_on_the_next_add() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    two_commit_history(&dir);

    dir.child("a.txt").write_str("scribbled over\n")?;
    run_grit_command(dir.path(), &["checkout", "HEAD", "--", "a.txt"])
        .assert()
        .success();

    // the restored entry carries zero stat fields; add re-stats it and the
    // tree comes out unchanged
    run_grit_command(dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    run_grit_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "nothing to commit, working tree clean",
        ));

    Ok(())
}
