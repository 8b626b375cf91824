use crate::common::command::{capture_stdout, run_grit_command};
use assert_fs::TempDir;
use assert_fs::fixture::{FileWriteStr, PathChild};

/// Repository with `top.txt`, `sub/inner.txt` and `sub/deep/leaf.txt`
/// staged, returning the root tree digest
fn fixture_tree(dir: &TempDir) -> String {
    run_grit_command(dir.path(), &["init"]).assert().success();

    dir.child("top.txt").write_str("top\n").unwrap();
    dir.child("sub/inner.txt").write_str("inner\n").unwrap();
    dir.child("sub/deep/leaf.txt").write_str("leaf\n").unwrap();

    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();

    capture_stdout(&mut run_grit_command(dir.path(), &["write-tree"]))
        .trim()
        .to_string()
}

#[test]
fn default_lists_one_level() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let tree = fixture_tree(&dir);

    let listing = capture_stdout(&mut run_grit_command(dir.path(), &["ls-tree", &tree]));
    let lines = listing.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 2);
    assert!(lines.iter().any(|l| l.contains("blob") && l.ends_with("top.txt")));
    assert!(lines.iter().any(|l| l.contains("tree") && l.ends_with("sub")));

    Ok(())
}

#[test]
fn recursive_lists_blobs_at_all_depths() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let tree = fixture_tree(&dir);

    let listing = capture_stdout(&mut run_grit_command(dir.path(), &["ls-tree", "-r", &tree]));
    let lines = listing.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.contains("blob")));
    assert!(lines.iter().any(|l| l.ends_with("sub/deep/leaf.txt")));

    Ok(())
}

#[test]
fn recursive_with_trees_includes_subtrees() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let tree = fixture_tree(&dir);

    let listing = capture_stdout(&mut run_grit_command(
        dir.path(),
        &["ls-tree", "-r", "-t", &tree],
    ));
    let lines = listing.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 5);
    assert!(lines.iter().any(|l| l.contains("tree") && l.ends_with("sub")));
    assert!(lines.iter().any(|l| l.contains("tree") && l.ends_with("sub/deep")));

    Ok(())
}

#[test]
fn dirs_only_lists_top_level_subtrees() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let tree = fixture_tree(&dir);

    let listing = capture_stdout(&mut run_grit_command(dir.path(), &["ls-tree", "-d", &tree]));
    let lines = listing.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("tree") && lines[0].ends_with("sub"));

    Ok(())
}

#[test]
fn dirs_only_recursive_lists_all_subtrees() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let tree = fixture_tree(&dir);

    let listing = capture_stdout(&mut run_grit_command(
        dir.path(),
        &["ls-tree", "-d", "-r", &tree],
    ));
    let lines = listing.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.contains("tree")));

    Ok(())
}
