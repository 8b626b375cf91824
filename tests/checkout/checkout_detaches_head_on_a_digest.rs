use crate::common::command::{grit_commit, head_oid, run_grit_command};
use assert_fs::TempDir;
use assert_fs::fixture::{FileWriteStr, PathChild};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

/// Two commits on master: first writes `a.txt`, second rewrites it and
/// adds `b.txt`; returns both digests
pub fn two_commit_history(dir: &TempDir) -> (String, String) {
    run_grit_command(dir.path(), &["init"]).assert().success();

    dir.child("a.txt").write_str("first a\n").unwrap();
    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    grit_commit(dir.path(), "first").assert().success();
    let first = head_oid(dir.path());

    dir.child("a.txt").write_str("second a\n").unwrap();
    dir.child("b.txt").write_str("second b\n").unwrap();
    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    grit_commit(dir.path(), "second").assert().success();
    let second = head_oid(dir.path());

    (first, second)
}

#[test]
fn checkout_detaches_head_on_a_digest() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let (first, _) = two_commit_history(&dir);

    run_grit_command(dir.path(), &["checkout", &first])
        .assert()
        .success();

    // HEAD now holds the digest directly
    let head = std::fs::read_to_string(dir.path().join(".git/HEAD"))?;
    assert_eq!(head, format!("{first}\n"));

    // the working tree reflects the first commit
    assert_eq!(
        std::fs::read_to_string(dir.path().join("a.txt"))?,
        "first a\n"
    );
    assert!(!dir.path().join("b.txt").exists());

    run_grit_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HEAD detached at"))
        .stdout(predicate::str::contains(
            "nothing to commit, working tree clean",
        ));

    Ok(())
}

#[test]
fn commit_while_detached_moves_head_only() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let (first, second) = two_commit_history(&dir);

    run_grit_command(dir.path(), &["checkout", &first])
        .assert()
        .success();

    dir.child("c.txt").write_str("detached work\n")?;
    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    grit_commit(dir.path(), "detached").assert().success();

    let detached_oid = head_oid(dir.path());
    assert_ne!(detached_oid, first);

    // master still points at the second commit
    let master = std::fs::read_to_string(dir.path().join(".git/refs/heads/master"))?;
    assert_eq!(master.trim(), second);

    Ok(())
}
