//! The index (staging area)
//!
//! Tracks which files go into the next commit, together with the stat cache
//! used for fast change detection. The whole file is rewritten on every
//! mutation; there is no partial update.
//!
//! ## Data Structures
//!
//! - `entries`: name → index entry, keyed by the `/`-separated name *string*
//!   so iteration follows bytewise ascending name order (the wire format's
//!   order; `Path`'s component-wise ordering would disagree for names like
//!   `a-b` next to `a/x`) and the writer structurally cannot emit an
//!   unsorted index
//! - `children`: directory name → tracked descendants, kept so a path
//!   flipping between file and directory evicts whatever it shadows

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::{ENTRY_BLOCK, ENTRY_MIN_SIZE, IndexEntry};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{CHECKSUM_SIZE, HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::IndexCodecError;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// The staging area, backed by `.git/index`
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file
    path: Box<Path>,
    /// Tracked files mapped by name, bytewise ascending
    entries: BTreeMap<String, IndexEntry>,
    /// Directory hierarchy for parent-child lookups
    children: BTreeMap<String, BTreeSet<String>>,
    /// Index file header metadata
    header: IndexHeader,
    /// Set when the in-memory state diverges from disk
    changed: bool,
}

fn key_of(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
            header: IndexHeader::new(String::from(SIGNATURE), VERSION, 0),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up an entry by its path
    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(key_of(path).as_str())
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.children.clear();
        self.header = IndexHeader::empty();
        self.changed = false;
    }

    /// Load the index from disk
    ///
    /// Validates the signature, version and size floor, parses the entries
    /// and verifies the checksum trailer. A missing or empty file yields an
    /// empty index (the legal pre-first-add state).
    ///
    /// # Locking
    ///
    /// Holds a shared lock on the index file while reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        if !self.path().exists() {
            self.clear();
            std::fs::File::create(self.path())?;
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        self.clear();

        let file_size = lock.deref_mut().metadata()?.len() as usize;
        if file_size == 0 {
            return Ok(());
        }
        if file_size < HEADER_SIZE + CHECKSUM_SIZE {
            return Err(IndexCodecError::Truncated.into());
        }

        let mut reader = Checksum::new(lock);
        let entries_count = self.parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;

        reader.verify()
    }

    fn parse_header(&self, reader: &mut Checksum) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header_reader = std::io::Cursor::new(header_bytes.clone());
        let header = IndexHeader::deserialize(header_reader)?;

        if header.marker != SIGNATURE {
            return Err(IndexCodecError::BadMagic.into());
        }

        if header.version != VERSION {
            return Err(IndexCodecError::UnsupportedVersion(header.version).into());
        }

        Ok(header.entries_count)
    }

    /// Parse all entries from the index file
    ///
    /// Entries are padded to 8-byte multiples from their own start, so after
    /// the minimum read the entry ends at the first block whose final byte
    /// is the padding NUL.
    fn parse_entries(&mut self, entries_count: u32, reader: &mut Checksum) -> anyhow::Result<()> {
        for _ in 0..entries_count {
            let entry_bytes = reader.read(ENTRY_MIN_SIZE)?;
            let mut entry_bytes = entry_bytes.to_vec();

            while entry_bytes[entry_bytes.len() - 1] != 0 {
                entry_bytes = [entry_bytes, reader.read(ENTRY_BLOCK)?.to_vec()].concat();
            }

            let entry_bytes = Bytes::from(entry_bytes);
            let entry_reader = std::io::Cursor::new(entry_bytes.clone());
            let entry = IndexEntry::deserialize(entry_reader)?;

            self.store_entry(&entry);
        }

        self.header.entries_count = entries_count;

        Ok(())
    }

    /// Remove whatever a new entry shadows before inserting it
    ///
    /// A file entry evicts any entry registered at one of its parent paths,
    /// and any children if the path used to be a directory.
    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        for parent in entry.parent_dirs() {
            self.remove_entry(parent);
        }
        self.remove_children(&entry.name);
    }

    fn store_entry(&mut self, entry: &IndexEntry) {
        let entry_key = key_of(&entry.name);

        for parent in entry.parent_dirs() {
            self.children
                .entry(key_of(parent))
                .or_default()
                .insert(entry_key.clone());
        }

        self.entries.insert(entry_key, entry.clone());
    }

    fn remove_children(&mut self, path_name: &Path) {
        if let Some(children) = self.children.remove(key_of(path_name).as_str()) {
            for child in children {
                self.remove_entry(Path::new(&child));
            }
        }
    }

    fn remove_entry(&mut self, path_name: &Path) {
        let entry_key = key_of(path_name);

        if let Some(entry) = self.entries.remove(&entry_key) {
            for parent in entry.parent_dirs() {
                let parent_key = key_of(parent);
                if let Some(children) = self.children.get_mut(&parent_key) {
                    children.remove(&entry_key);
                    if children.is_empty() {
                        self.children.remove(&parent_key);
                    }
                }
            }
        }
    }

    /// Insert or replace an entry by name
    pub fn add(&mut self, entry: IndexEntry) {
        self.discard_conflicts(&entry);
        self.store_entry(&entry);

        self.header.entries_count = self.entries.len() as u32;
        self.changed = true;
    }

    /// Remove an entry (and any children, if the path is a directory)
    pub fn remove(&mut self, path: PathBuf) {
        self.remove_entry(&path);
        self.remove_children(&path);

        self.header.entries_count = self.entries.len() as u32;
        self.changed = true;
    }

    /// Drop all current entries and adopt the given ones
    ///
    /// Used by `read-tree` and checkout, which replace the index wholesale.
    pub fn replace_with(&mut self, entries: impl Iterator<Item = IndexEntry>) {
        self.entries.clear();
        self.children.clear();

        for entry in entries {
            self.store_entry(&entry);
        }

        self.header.entries_count = self.entries.len() as u32;
        self.changed = true;
    }

    /// Rewrite the index file from the in-memory state
    ///
    /// The map ordering guarantees ascending name order, maintaining the
    /// sorted invariant; the checksum wrapper appends the trailer.
    ///
    /// # Locking
    ///
    /// Holds an exclusive lock on the index file while writing.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = Checksum::new(lock);

        self.header = IndexHeader {
            entries_count: self.entries.len() as u32,
            ..self.header.clone()
        };
        let header_bytes = self.header.serialize()?;
        writer.write(&header_bytes)?;

        for entry in self.entries() {
            let entry_bytes = entry.serialize()?;
            writer.write(&entry_bytes)?;
        }

        writer.write_checksum()?;
        self.changed = false;

        Ok(())
    }

    /// Entries in bytewise ascending name order
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
