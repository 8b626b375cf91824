//! Tree object
//!
//! Trees are directory snapshots: an ordered sequence of (mode, name, digest)
//! entries pointing at blobs and subtrees.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`, each entry being
//! `<mode-octal> <name>\0<20 raw digest bytes>` with the subtree mode
//! rendered as `40000` (no leading zero).
//!
//! ## Entry order
//!
//! Entries are sorted by name, with subtree names compared as if they were
//! suffixed with `/`. Internally subtree keys are stored *with* the trailing
//! slash, so the map's natural order is the canonical order and the sort can
//! never drift from the serialization. The slash is stripped when entries are
//! rendered.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::CoreError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;

/// A child of a tree being built from the index
#[derive(Debug, Clone)]
enum TreeEntry {
    /// File entry (blob reference taken from the index)
    File(IndexEntry),
    /// Directory entry (nested tree)
    Directory(Tree),
}

impl TreeEntry {
    fn object_type(&self) -> ObjectType {
        match self {
            TreeEntry::File(_) => ObjectType::Blob,
            TreeEntry::Directory(_) => ObjectType::Tree,
        }
    }

    fn mode(&self) -> EntryMode {
        match self {
            TreeEntry::File(entry) => entry.metadata.mode,
            TreeEntry::Directory(_) => EntryMode::Directory,
        }
    }

    fn oid(&self) -> anyhow::Result<ObjectId> {
        match self {
            TreeEntry::File(entry) => Ok(entry.oid.clone()),
            TreeEntry::Directory(tree) => tree.object_id(),
        }
    }
}

/// Tree object representing one directory level
///
/// A tree is either *writeable* (built from index entries, about to be
/// stored) or *readable* (parsed from the database). The two entry maps keep
/// those flows apart while sharing the serialization rules.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// Entries parsed from the database (read mode), keyed by raw name
    readable_entries: BTreeMap<String, DatabaseEntry>,
    /// Entries being built from the index (write mode); subtree keys carry a
    /// trailing `/` so map order equals canonical entry order
    writeable_entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Build a tree hierarchy from index entries
    ///
    /// Groups the flat, sorted entry list by path components. Directories
    /// exist only because an entry lives under them; no empty directories
    /// are ever created.
    pub fn build<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for entry in entries {
            let parents = entry.parent_dirs();
            root.add_entry(parents, entry)?;
        }

        Ok(root)
    }

    /// Traverse the tree depth-first, children before parents
    ///
    /// Post-order is required for storage: a parent entry embeds the digest
    /// of each child tree, so children must be written first.
    pub fn traverse<F>(&self, func: &F) -> anyhow::Result<()>
    where
        F: Fn(&Tree) -> anyhow::Result<()>,
    {
        for entry in &self.writeable_entries {
            if let TreeEntry::Directory(tree) = entry.1 {
                tree.traverse(func)?;
            }
        }
        func(self)?;

        Ok(())
    }

    fn add_entry(&mut self, parents: Vec<&Path>, entry: &IndexEntry) -> anyhow::Result<()> {
        if parents.is_empty() {
            self.writeable_entries
                .insert(entry.basename()?.to_string(), TreeEntry::File(entry.clone()));
        } else {
            let parent = parents[0]
                .file_name()
                .and_then(|s| s.to_str())
                .context("invalid parent path component")?;
            // subtree keys carry the trailing '/' (see module docs)
            let parent = format!("{parent}/");
            let tree = match self
                .writeable_entries
                .entry(parent)
                .or_insert_with(|| TreeEntry::Directory(Tree::default()))
            {
                TreeEntry::Directory(tree) => tree,
                TreeEntry::File(_) => {
                    return Err(CoreError::Conflict(format!(
                        "path component {:?} is both a file and a directory",
                        parents[0]
                    ))
                    .into());
                }
            };
            tree.add_entry(parents[1..].to_vec(), entry)?;
        }

        Ok(())
    }

    /// Entries of a tree parsed from the database, (name, entry) pairs
    pub fn entries(&self) -> impl Iterator<Item = (&String, &DatabaseEntry)> {
        self.readable_entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, DatabaseEntry)> {
        self.readable_entries.into_iter()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();
        for (name, tree_entry) in &self.writeable_entries {
            let name = name.trim_end_matches('/');

            let header = format!("{} {}", tree_entry.mode().as_str(), name);
            content_bytes.write_all(header.as_bytes())?;
            content_bytes.push(0);
            tree_entry.oid()?.write_h40_to(&mut content_bytes)?;
        }

        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut reader = reader;

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(CoreError::Corrupt("unexpected EOF in tree entry mode".into()).into());
            }

            let mode_str = std::str::from_utf8(&mode_bytes)
                .map_err(|_| CoreError::Corrupt("tree entry mode is not UTF-8".into()))?;
            let mode = EntryMode::from_octal_str(mode_str)?;

            // Read "name\0"
            name_bytes.clear();
            let n = reader.read_until(b'\0', &mut name_bytes)?;
            if n == 0 || name_bytes.pop() != Some(b'\0') {
                return Err(CoreError::Corrupt("unexpected EOF in tree entry name".into()).into());
            }
            let name = std::str::from_utf8(&name_bytes)
                .map_err(|_| CoreError::Corrupt("tree entry name is not UTF-8".into()))?
                .to_owned();
            if name.is_empty() || name.contains('/') {
                return Err(
                    CoreError::Corrupt(format!("invalid tree entry name: {name:?}")).into(),
                );
            }

            let oid = ObjectId::read_h40_from(&mut reader)
                .context("unexpected EOF in tree entry object id")?;

            entries.insert(name, DatabaseEntry::new(oid, mode));
        }

        Ok(Tree {
            readable_entries: entries,
            writeable_entries: Default::default(),
        })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.readable_entries
            .iter()
            .map(|(name, entry)| {
                let object_type = if entry.is_tree() {
                    ObjectType::Tree
                } else {
                    ObjectType::Blob
                };

                format!(
                    "{:06o} {} {}\t{}",
                    entry.mode.as_u32(),
                    object_type.as_str(),
                    entry.oid.as_ref(),
                    name
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}
