use crate::common::command::{capture_stdout, grit_commit, head_oid, run_grit_command};
use assert_fs::fixture::{FileWriteStr, PathChild};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

#[test]
fn cat_file_round_trips_blob_content() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    let content = "four score and seven years ago\n";
    dir.child("speech.txt").write_str(content)?;

    let sha = capture_stdout(&mut run_grit_command(
        dir.path(),
        &["hash-object", "-w", "speech.txt"],
    ));
    let sha = sha.trim();

    let printed = capture_stdout(&mut run_grit_command(dir.path(), &["cat-file", "-p", sha]));
    assert_eq!(printed, content);

    run_grit_command(dir.path(), &["cat-file", "-t", sha])
        .assert()
        .success()
        .stdout(predicate::eq("blob\n"));

    run_grit_command(dir.path(), &["cat-file", "-s", sha])
        .assert()
        .success()
        .stdout(predicate::eq(format!("{}\n", content.len())));

    Ok(())
}

#[test]
fn cat_file_resolves_head_to_the_commit() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    dir.child("a.txt").write_str("hello\n")?;
    run_grit_command(dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    grit_commit(dir.path(), "first").assert().success();

    run_grit_command(dir.path(), &["cat-file", "-t", "HEAD"])
        .assert()
        .success()
        .stdout(predicate::eq("commit\n"));

    let printed = capture_stdout(&mut run_grit_command(dir.path(), &["cat-file", "-p", "HEAD"]));
    assert!(printed.starts_with("tree "));
    assert!(printed.contains("first"));

    // the same text as when addressed by the raw digest
    let oid = head_oid(dir.path());
    let by_digest = capture_stdout(&mut run_grit_command(dir.path(), &["cat-file", "-p", &oid]));
    assert_eq!(printed, by_digest);

    Ok(())
}

#[test]
fn cat_file_requires_exactly_one_mode_flag() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    run_grit_command(dir.path(), &["cat-file", "HEAD"])
        .assert()
        .failure();

    run_grit_command(dir.path(), &["cat-file", "-p", "-t", "HEAD"])
        .assert()
        .failure();

    Ok(())
}

#[test]
fn cat_file_reports_missing_objects() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    run_grit_command(
        dir.path(),
        &["cat-file", "-t", "0123456789abcdef0123456789abcdef01234567"],
    )
    .assert()
    .failure();

    Ok(())
}
