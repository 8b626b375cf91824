use crate::common::command::{capture_stdout, grit_commit, head_oid, run_grit_command};
use assert_fs::fixture::{FileWriteStr, PathChild};

#[test]
fn second_commit_records_its_parent() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    dir.child("a.txt").write_str("one\n")?;
    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    grit_commit(dir.path(), "first").assert().success();
    let first_oid = head_oid(dir.path());

    dir.child("a.txt").write_str("two\n")?;
    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    grit_commit(dir.path(), "second").assert().success();
    let second_oid = head_oid(dir.path());

    assert_ne!(first_oid, second_oid);

    let commit_text = capture_stdout(&mut run_grit_command(
        dir.path(),
        &["cat-file", "-p", &second_oid],
    ));
    assert!(commit_text.contains(&format!("parent {first_oid}\n")));

    Ok(())
}
