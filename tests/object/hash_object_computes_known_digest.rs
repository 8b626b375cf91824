use crate::common::command::run_grit_command;
use crate::common::objects::{blob_digest, object_path};
use assert_fs::fixture::{FileWriteStr, PathChild};
use predicates::prelude::predicate;

const HELLO_DIGEST: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

#[test]
fn hash_object_computes_the_well_known_blob_digest() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    dir.child("a.txt").write_str("hello\n")?;

    // sha1("blob 6\0hello\n"), the digest every implementation must agree on
    assert_eq!(blob_digest(b"hello\n"), HELLO_DIGEST);

    run_grit_command(dir.path(), &["hash-object", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::eq(format!("{HELLO_DIGEST}\n")));

    // without -w nothing lands in the object store
    assert!(!dir.path().join(object_path(HELLO_DIGEST)).exists());

    Ok(())
}

#[test]
fn hash_object_with_write_stores_the_object() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    dir.child("a.txt").write_str("hello\n")?;

    run_grit_command(dir.path(), &["hash-object", "-w", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::eq(format!("{HELLO_DIGEST}\n")));

    assert!(dir.path().join(object_path(HELLO_DIGEST)).is_file());

    // rehashing identical content is idempotent
    run_grit_command(dir.path(), &["hash-object", "-w", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::eq(format!("{HELLO_DIGEST}\n")));

    Ok(())
}

#[test]
fn hash_object_rejects_unknown_types() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    dir.child("a.txt").write_str("hello\n")?;

    run_grit_command(dir.path(), &["hash-object", "-t", "tag", "a.txt"])
        .assert()
        .failure();

    Ok(())
}
