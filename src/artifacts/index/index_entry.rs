//! Index entry representation
//!
//! Each entry tracks one file: its path, content digest, and a stat cache
//! (mode, size, timestamps, device, inode, owner) that lets `add` and
//! `status` skip re-hashing files whose metadata is unchanged.
//!
//! ## Entry Format
//!
//! A 62-byte fixed prefix (ten big-endian u32 stat fields, the 20-byte
//! digest, a u16 flags word whose low 12 bits hold `min(name_len, 0xFFF)`),
//! the name bytes, a NUL terminator, then zero padding to the next 8-byte
//! boundary measured from the entry start.
//!
//! The on-disk stat fields are 32-bit by format mandate even though modern
//! filesystems report 64-bit values; the narrowing happens in exactly one
//! place, the `TryFrom<(&Path, Metadata)>` conversion below.

use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{CoreError, IndexCodecError};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use is_executable::IsExecutable;
use std::cmp::min;
use std::fs::Metadata;
use std::io::{BufRead, Write};
use std::os::unix::prelude::MetadataExt;
use std::path::{Path, PathBuf};

/// Maximum name length representable in the flags word (12 bits)
const MAX_FLAG_PATH_SIZE: usize = 0xFFF;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Minimum size of a serialized index entry in bytes (62-byte prefix, a
/// one-byte name and one padding NUL)
pub const ENTRY_MIN_SIZE: usize = 64;

/// Index entry for one tracked file
#[derive(Debug, Clone, Default, new)]
pub struct IndexEntry {
    /// File path relative to the repository root, `/`-separated
    pub name: PathBuf,
    /// Digest of the file's blob
    pub oid: ObjectId,
    /// Stat cache for fast change detection
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    pub fn basename(&self) -> anyhow::Result<&str> {
        self.name
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| CoreError::InvalidArgument(format!("invalid file name {:?}", self.name)).into())
    }

    /// The entry's parent directories, outermost first (`a/b/c` → `a`, `a/b`)
    pub fn parent_dirs(&self) -> Vec<&Path> {
        let mut dirs = Vec::new();
        let mut parent = self.name.parent();

        while let Some(new_parent) = parent {
            dirs.push(new_parent);
            parent = new_parent.parent();
        }
        dirs.reverse();

        // drop the empty root component
        dirs[1..].to_vec()
    }

    /// Compare the cached stat fields (everything but the timestamps)
    pub fn stat_match(&self, other: &EntryMetadata) -> bool {
        self.metadata.mode == other.mode
            && self.metadata.size == other.size
            && self.metadata.dev == other.dev
            && self.metadata.ino == other.ino
    }

    /// Compare the cached timestamps, nanoseconds included
    pub fn times_match(&self, other: &EntryMetadata) -> bool {
        self.metadata.ctime == other.ctime
            && self.metadata.ctime_nsec == other.ctime_nsec
            && self.metadata.mtime == other.mtime
            && self.metadata.mtime_nsec == other.mtime_nsec
    }
}

impl PartialEq for IndexEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for IndexEntry {}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

/// Stat cache stored in index entries
///
/// All fields carry exactly what the wire format stores: 32-bit values,
/// already narrowed from the platform's 64-bit stat results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Status-change time (seconds since the epoch)
    pub ctime: u32,
    /// Status-change time, nanosecond part
    pub ctime_nsec: u32,
    /// Content-modification time (seconds since the epoch)
    pub mtime: u32,
    /// Content-modification time, nanosecond part
    pub mtime_nsec: u32,
    /// Device ID
    pub dev: u32,
    /// Inode number
    pub ino: u32,
    /// File mode
    pub mode: EntryMode,
    /// Owning user ID
    pub uid: u32,
    /// Owning group ID
    pub gid: u32,
    /// File size in bytes
    pub size: u32,
}

impl Packable for IndexEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let entry_name = self
            .name
            .to_str()
            .ok_or_else(|| CoreError::InvalidArgument(format!("invalid entry name {:?}", self.name)))?;
        // low 12 bits of the flags word; longer names are capped, never cut
        let flags = min(entry_name.len(), MAX_FLAG_PATH_SIZE) as u16;

        let mut entry_bytes = Vec::new();
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ctime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ctime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mtime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mtime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.dev)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ino)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mode.as_u32())?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.uid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.gid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.size)?;
        self.oid.write_h40_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(flags)?;
        entry_bytes.write_all(entry_name.as_bytes())?;

        // NUL-terminate, then pad with zeros to an 8-byte boundary measured
        // from the entry start; padding length lands in [1, 8]
        entry_bytes.push(0);
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }
}

impl Unpackable for IndexEntry {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let bytes = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        if bytes.len() < ENTRY_MIN_SIZE {
            return Err(IndexCodecError::Truncated.into());
        }

        let ctime = byteorder::NetworkEndian::read_u32(&bytes[0..4]);
        let ctime_nsec = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        let mtime = byteorder::NetworkEndian::read_u32(&bytes[8..12]);
        let mtime_nsec = byteorder::NetworkEndian::read_u32(&bytes[12..16]);
        let dev = byteorder::NetworkEndian::read_u32(&bytes[16..20]);
        let ino = byteorder::NetworkEndian::read_u32(&bytes[20..24]);
        let mode = EntryMode::try_from(byteorder::NetworkEndian::read_u32(&bytes[24..28]))?;
        let uid = byteorder::NetworkEndian::read_u32(&bytes[28..32]);
        let gid = byteorder::NetworkEndian::read_u32(&bytes[32..36]);
        let size = byteorder::NetworkEndian::read_u32(&bytes[36..40]);
        let mut oid_bytes = std::io::Cursor::new(&bytes[40..60]);
        let oid = ObjectId::read_h40_from(&mut oid_bytes)?;
        let _flags = byteorder::NetworkEndian::read_u16(&bytes[60..62]);

        // the name runs up to its NUL terminator
        let name_end = bytes[62..]
            .iter()
            .position(|&b| b == 0)
            .ok_or(IndexCodecError::UnterminatedName)?;
        let name_bytes = &bytes[62..62 + name_end];
        let name = PathBuf::from(
            std::str::from_utf8(name_bytes)
                .map_err(|_| CoreError::Corrupt("entry name is not valid UTF-8".into()))?,
        );

        Ok(IndexEntry {
            name,
            oid,
            metadata: EntryMetadata {
                ctime,
                ctime_nsec,
                mtime,
                mtime_nsec,
                dev,
                ino,
                mode,
                uid,
                gid,
                size,
            },
        })
    }
}

impl TryFrom<(&Path, Metadata)> for EntryMetadata {
    type Error = anyhow::Error;

    /// Capture a stat result into the wire representation.
    ///
    /// This is the single place where the platform's 64-bit stat fields are
    /// narrowed to the format's 32 bits.
    fn try_from((file_path, metadata): (&Path, Metadata)) -> Result<Self, Self::Error> {
        let mode = if metadata.is_dir() {
            EntryMode::Directory
        } else {
            match file_path.is_executable() {
                true => EntryMode::File(FileMode::Executable),
                false => EntryMode::File(FileMode::Regular),
            }
        };

        Ok(Self {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode,
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
        })
    }
}
