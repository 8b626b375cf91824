use crate::common::command::{capture_stdout, grit_commit, head_oid, run_grit_command};
use assert_fs::fixture::{FileWriteStr, PathChild};
use pretty_assertions::assert_eq;

#[test]
fn resolve_full_digest_and_unique_prefix() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    dir.child("a.txt").write_str("content\n")?;
    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    grit_commit(dir.path(), "only").assert().success();

    let oid = head_oid(dir.path());
    let by_full = capture_stdout(&mut run_grit_command(dir.path(), &["cat-file", "-p", &oid]));

    // a unique 8-character prefix resolves to the same commit
    let by_prefix = capture_stdout(&mut run_grit_command(
        dir.path(),
        &["cat-file", "-p", &oid[..8]],
    ));
    assert_eq!(by_full, by_prefix);

    // ancestry suffixes compose with digests too
    dir.child("a.txt").write_str("more\n")?;
    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    grit_commit(dir.path(), "second").assert().success();

    let second = head_oid(dir.path());
    let parent_of_second = capture_stdout(&mut run_grit_command(
        dir.path(),
        &["cat-file", "-p", &format!("{second}~1")],
    ));
    assert_eq!(parent_of_second, by_full);

    Ok(())
}
