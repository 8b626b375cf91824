use crate::common::command::{grit_commit, run_grit_command};
use assert_fs::fixture::{FileWriteStr, PathChild};
use pretty_assertions::assert_eq;

/// HEAD has {x: h1}; the index has {x: h2, y: h3}; the working tree has
/// {x: h2, y: h4, z}. Staged must be {x: modified, y: added}, unstaged
/// {y: modified}, untracked {z}.
#[test]
fn report_staged_unstaged_and_untracked_together() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    dir.child("x.txt").write_str("x version 1\n")?;
    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    grit_commit(dir.path(), "base").assert().success();

    dir.child("x.txt").write_str("x version 2\n")?;
    dir.child("y.txt").write_str("y version 1\n")?;
    run_grit_command(dir.path(), &["add", "x.txt", "y.txt"])
        .assert()
        .success();

    dir.child("y.txt").write_str("y version 2\n")?;
    dir.child("z.txt").write_str("z\n")?;

    let output = run_grit_command(dir.path(), &["status"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone())?;

    let staged = section(&stdout, "Changes to be committed:");
    assert!(staged.contains("modified:") && staged.contains("x.txt"));
    assert!(staged.contains("new file:") && staged.contains("y.txt"));

    let unstaged = section(&stdout, "Changes not staged for commit:");
    assert!(unstaged.contains("modified:") && unstaged.contains("y.txt"));
    assert!(!unstaged.contains("x.txt"));

    let untracked = section(&stdout, "Untracked files:");
    assert!(untracked.contains("z.txt"));

    Ok(())
}

#[test]
fn report_staged_deletion() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    dir.child("a.txt").write_str("a\n")?;
    dir.child("b.txt").write_str("b\n")?;
    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    grit_commit(dir.path(), "base").assert().success();

    std::fs::remove_file(dir.path().join("b.txt"))?;
    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();

    let output = run_grit_command(dir.path(), &["status"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone())?;

    let staged = section(&stdout, "Changes to be committed:");
    assert!(staged.contains("deleted:") && staged.contains("b.txt"));
    assert_eq!(stdout.matches("b.txt").count(), 1);

    Ok(())
}

/// The lines of one status section, up to the next blank line
fn section<'a>(stdout: &'a str, header: &str) -> String {
    let start = stdout
        .find(header)
        .unwrap_or_else(|| panic!("section {header:?} not found in:\n{stdout}"));
    let rest = &stdout[start + header.len()..];
    let end = rest.find("\n\n").unwrap_or(rest.len());
    rest[..end].to_string()
}
