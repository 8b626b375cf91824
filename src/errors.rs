//! Structured error taxonomy
//!
//! The core surfaces failures as values of these enumerations so the CLI
//! layer (the only place that prints) can render them and pick an exit code,
//! and so tests can match on kinds instead of message text. Commands still
//! use `anyhow::Result`; these variants are raised at the failure site and
//! travel inside the `anyhow` chain.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// CLI misuse, bad mode string, non-relative path
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing object, ref or file
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed object header, truncated or corrupt index, bad tree
    /// encoding, bad HEAD content
    #[error("corrupt repository data: {0}")]
    Corrupt(String),

    /// Branch already exists, or a write-once target would change content
    #[error("conflict: {0}")]
    Conflict(String),

    /// Underlying filesystem failure
    #[error("io error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Index version other than 2, object type outside {blob, tree, commit}
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Index codec failures, kept separate so the reader can report exactly what
/// broke in the binary format.
#[derive(Debug, Error)]
pub enum IndexCodecError {
    #[error("invalid index file signature")]
    BadMagic,

    #[error("unsupported index file version: {0}")]
    UnsupportedVersion(u32),

    #[error("index file is truncated")]
    Truncated,

    #[error("unterminated entry name in index")]
    UnterminatedName,

    #[error("index checksum does not match value stored on disk")]
    ChecksumMismatch,
}
