//! Core object traits
//!
//! Every object kind (blob, tree, commit) implements:
//! - `Packable`: serialization to the canonical binary form
//! - `Unpackable`: deserialization from the binary form
//! - `Object`: shared operations (ID computation, display)
//!
//! ## Object Format
//!
//! All objects are framed as:
//! ```text
//! <type> <size>\0<payload>
//! ```
//! then zlib-compressed and stored under `.git/objects/`. The SHA-1 digest of
//! the framed bytes is the object's address; identical content always hashes
//! to the same address, across runs and hosts.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;
use std::path::PathBuf;

/// Trait for serializing objects to the canonical binary format
pub trait Packable {
    /// Serialize the object to bytes, including the `<type> <size>\0` header
    fn serialize(&self) -> Result<Bytes>;
}

/// Trait for deserializing objects from the binary format
pub trait Unpackable {
    /// Deserialize the object from a reader (header already consumed)
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// Common object operations
///
/// Implemented by all object types (Blob, Tree, Commit).
pub trait Object: Packable {
    /// Get the object's type
    fn object_type(&self) -> ObjectType;

    /// Get a human-readable representation (used by `cat-file -p`)
    fn display(&self) -> String;

    /// Compute the object ID: the SHA-1 digest of the serialized content.
    ///
    /// Pure with respect to the object's bytes; no I/O happens here.
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        let mut hasher = Sha1::new();
        hasher.update(&content);

        let oid = hasher.finalize();
        ObjectId::try_parse(format!("{oid:x}"))
    }

    /// Get the relative path under `objects/` where this object is stored
    fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

/// Type-erased object container
///
/// Used when the object kind is only known at runtime, e.g. when `cat-file`
/// loads an arbitrary digest.
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}
