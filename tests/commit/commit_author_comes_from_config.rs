use crate::common::command::{capture_stdout, head_oid, run_grit_command};
use assert_fs::fixture::{FileWriteStr, PathChild};
use predicates::prelude::predicate;
use predicates::Predicate;

#[test]
fn commit_author_comes_from_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    run_grit_command(dir.path(), &["config", "set", "user.name", "Grace Brewster Hopper"])
        .assert()
        .success();
    run_grit_command(dir.path(), &["config", "set", "user.email", "grace@example.com"])
        .assert()
        .success();

    dir.child("a.txt").write_str("hello\n")?;
    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();

    // no GIT_AUTHOR_* overrides here: identity comes from the config
    let mut cmd = run_grit_command(dir.path(), &["commit", "-m", "configured"]);
    cmd.env_remove("GIT_AUTHOR_NAME").env_remove("GIT_AUTHOR_EMAIL");
    cmd.assert().success();

    let oid = head_oid(dir.path());
    let commit_text = capture_stdout(&mut run_grit_command(dir.path(), &["cat-file", "-p", &oid]));

    // multi-word names survive, and the header shape is the canonical one
    assert!(commit_text.contains("author Grace Brewster Hopper <grace@example.com>"));
    assert!(
        predicates::str::is_match(
            r"author Grace Brewster Hopper <grace@example\.com> \d+ [+-]\d{4}\n"
        )?
        .eval(&commit_text)
    );

    Ok(())
}

#[test]
fn env_overrides_config_identity() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    run_grit_command(dir.path(), &["config", "set", "user.name", "Config Name"])
        .assert()
        .success();
    run_grit_command(dir.path(), &["config", "set", "user.email", "config@example.com"])
        .assert()
        .success();

    dir.child("a.txt").write_str("hello\n")?;
    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();

    let mut cmd = run_grit_command(dir.path(), &["commit", "-m", "overridden"]);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", "Env Name"),
        ("GIT_AUTHOR_EMAIL", "env@example.com"),
    ]);
    cmd.assert().success();

    let oid = head_oid(dir.path());
    let commit_text = capture_stdout(&mut run_grit_command(dir.path(), &["cat-file", "-p", &oid]));
    assert!(commit_text.contains("author Env Name <env@example.com>"));

    Ok(())
}

#[test]
fn commit_without_any_identity_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    // wipe the default [user] section
    std::fs::write(dir.path().join(".git/config"), "[core]\n\tbare = false\n")?;

    dir.child("a.txt").write_str("hello\n")?;
    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();

    let mut cmd = run_grit_command(dir.path(), &["commit", "-m", "anonymous"]);
    cmd.env_remove("GIT_AUTHOR_NAME").env_remove("GIT_AUTHOR_EMAIL");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("user.name"));

    Ok(())
}
