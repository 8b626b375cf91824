//! Index file format (DIRC, version 2)
//!
//! The index (staging area) is a flat, sorted list of tracked files with a
//! stat cache used for fast change detection.
//!
//! ## File Format
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2 (4 bytes, big-endian)
//!   - Entry count (4 bytes, big-endian)
//!
//! Entries (variable length):
//!   - 62-byte fixed prefix (stat cache, digest, flags)
//!   - NUL-terminated name, then zero padding to an 8-byte boundary
//!     measured from the entry start (always at least one NUL)
//!
//! Checksum (20 bytes):
//!   - SHA-1 of all preceding bytes
//! ```

pub mod checksum;
pub mod entry_mode;
pub mod index_entry;
pub mod index_header;

/// Size of the SHA-1 trailer in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of the index header in bytes
pub const HEADER_SIZE: usize = 12;

/// Magic signature identifying index files
pub const SIGNATURE: &str = "DIRC";

/// Index file format version; the only one read or written
pub const VERSION: u32 = 2;
