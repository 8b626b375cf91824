use crate::common::command::{capture_stdout, grit_commit, head_oid, run_grit_command};
use crate::common::objects::{blob_digest, tree_digest, tree_entry};
use assert_fs::fixture::{FileWriteStr, PathChild};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

#[test]
fn first_commit_advances_the_branch() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    dir.child("a.txt").write_str("hello\n")?;
    run_grit_command(dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    grit_commit(dir.path(), "x")
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^\[\(root-commit\) [0-9a-f]{40}\] x\n$",
        )?);

    // the branch ref now holds the new commit digest, newline-terminated
    let ref_content = std::fs::read_to_string(dir.path().join(".git/refs/heads/master"))?;
    assert!(ref_content.ends_with('\n'));
    let commit_oid = ref_content.trim();
    assert_eq!(commit_oid.len(), 40);

    // and its tree is exactly {(100644, "a.txt", blob("hello\n"))}
    let expected_tree = tree_digest(&[tree_entry("100644", "a.txt", &blob_digest(b"hello\n"))]);
    let commit_text = capture_stdout(&mut run_grit_command(
        dir.path(),
        &["cat-file", "-p", commit_oid],
    ));
    assert!(commit_text.starts_with(&format!("tree {expected_tree}\n")));
    assert!(!commit_text.contains("parent "));

    Ok(())
}

#[test]
fn commit_refuses_an_empty_index() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    grit_commit(dir.path(), "empty")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "nothing to commit, working tree clean",
        ));

    assert!(!dir.path().join(".git/refs/heads/master").exists());

    Ok(())
}

#[test]
fn commit_message_keeps_multiple_lines() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    dir.child("a.txt").write_str("hello\n")?;
    run_grit_command(dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    grit_commit(dir.path(), "summary\n\nbody of the change")
        .assert()
        .success()
        // only the first line lands in the confirmation
        .stdout(predicate::str::contains("] summary\n"));

    let oid = head_oid(dir.path());
    let commit_text = capture_stdout(&mut run_grit_command(dir.path(), &["cat-file", "-p", &oid]));
    assert!(commit_text.contains("summary\n\nbody of the change"));

    Ok(())
}
