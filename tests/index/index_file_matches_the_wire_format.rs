use crate::common::command::run_grit_command;
use assert_fs::fixture::{FileWriteStr, PathChild};
use pretty_assertions::assert_eq;
use sha1::{Digest, Sha1};

#[test]
fn index_file_matches_the_wire_format() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_grit_command(dir.path(), &["init"]).assert().success();

    dir.child("b.txt").write_str("bee\n")?;
    dir.child("a.txt").write_str("ay\n")?;
    dir.child("sub/c.txt").write_str("sea\n")?;

    run_grit_command(dir.path(), &["add", "."])
        .assert()
        .success();

    let index = std::fs::read(dir.path().join(".git/index"))?;

    // 12-byte header: "DIRC", version 2, entry count
    assert_eq!(&index[0..4], b"DIRC");
    assert_eq!(u32::from_be_bytes(index[4..8].try_into()?), 2);
    assert_eq!(u32::from_be_bytes(index[8..12].try_into()?), 3);

    // the trailer is the SHA-1 of everything before it
    let (body, trailer) = index.split_at(index.len() - 20);
    let mut hasher = Sha1::new();
    hasher.update(body);
    assert_eq!(trailer, hasher.finalize().as_slice());

    // entries are sorted by name: a.txt, b.txt, sub/c.txt
    let names = parse_entry_names(body);
    assert_eq!(names, vec!["a.txt", "b.txt", "sub/c.txt"]);

    Ok(())
}

/// Walk the entry region, collecting names and checking the 8-byte
/// alignment padding as we go
fn parse_entry_names(body: &[u8]) -> Vec<String> {
    let count = u32::from_be_bytes(body[8..12].try_into().unwrap()) as usize;
    let mut names = Vec::new();
    let mut offset = 12;

    for _ in 0..count {
        let entry_start = offset;

        // flags carry min(name_len, 0xFFF) in the low 12 bits
        let flags = u16::from_be_bytes(body[offset + 60..offset + 62].try_into().unwrap());
        let name_len = (flags & 0xFFF) as usize;

        let name_bytes = &body[offset + 62..offset + 62 + name_len];
        names.push(String::from_utf8(name_bytes.to_vec()).unwrap());

        offset += 62 + name_len;
        // NUL terminator plus zero padding to an 8-byte multiple
        let padding = 8 - ((offset - entry_start) % 8);
        assert!(body[offset..offset + padding].iter().all(|&b| b == 0));
        offset += padding;
    }

    assert_eq!(offset, body.len());
    names
}
