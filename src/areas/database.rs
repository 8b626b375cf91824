//! Object database
//!
//! Content-addressable storage for blobs, trees and commits. Objects are
//! identified by the SHA-1 of their framed bytes and stored zlib-compressed
//! in a directory layout keyed by the digest prefix.
//!
//! ## Storage Format
//!
//! - Path: `.git/objects/ab/cdef123…` (first 2 hex chars as directory)
//! - Content: zlib-compressed `<type> <size>\0<payload>`
//!
//! The store is append-only and write-if-absent: an object that already
//! exists is never rewritten, and because addresses are content digests a
//! duplicate write could only ever carry identical bytes.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::CoreError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Loose object store
#[derive(Debug)]
pub struct Database {
    /// Path to the objects directory (typically `.git/objects`)
    path: Box<Path>,
}

impl Database {
    /// Create a new database instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the objects directory (typically `.git/objects`)
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    /// Get the path to the objects directory
    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object in the database
    ///
    /// The object is serialized and written to the path derived from its
    /// digest. If that path already exists this is a no-op: the store is
    /// idempotent by construction.
    pub fn store(&self, object: impl Object) -> anyhow::Result<()> {
        let object_path = self.path.join(object.object_path()?);
        let object_content = object.serialize()?;

        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object_content)?;
        }

        Ok(())
    }

    /// Load the raw decompressed bytes of an object, header included
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.read_object(object_id)
    }

    /// Hash a payload as an object of the given type, without touching disk
    ///
    /// Pure: the digest of `"<type> <size>\0<payload>"`, the same address
    /// [`Database::store_raw`] would write to.
    pub fn hash_raw(object_type: ObjectType, payload: &[u8]) -> anyhow::Result<ObjectId> {
        let framed = Self::frame(object_type, payload);

        let mut hasher = Sha1::new();
        hasher.update(&framed);
        ObjectId::try_parse(format!("{:x}", hasher.finalize()))
    }

    /// Store a raw payload as an object of the given type
    ///
    /// Idempotent like [`Database::store`]; returns the digest either way.
    pub fn store_raw(&self, object_type: ObjectType, payload: &[u8]) -> anyhow::Result<ObjectId> {
        let oid = Self::hash_raw(object_type, payload)?;
        let object_path = self.path.join(oid.to_path());

        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, Bytes::from(Self::frame(object_type, payload)))?;
        }

        Ok(oid)
    }

    fn frame(object_type: ObjectType, payload: &[u8]) -> Vec<u8> {
        let mut framed = format!("{} {}\0", object_type.as_str(), payload.len()).into_bytes();
        framed.extend_from_slice(payload);
        framed
    }

    /// Parse an object from the database into the appropriate type
    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(object_reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(
                object_reader,
            )?))),
        }
    }

    /// Parse an object as a Blob, if it is one
    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(Some(Blob::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    /// Parse an object as a Tree, if it is one
    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tree>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Tree => Ok(Some(Tree::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    /// Parse an object as a Commit, if it is one
    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    /// Get the type of an object without fully parsing it
    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    /// Walk a tree recursively into a flat `path → entry` map
    ///
    /// Blobs appear under their full path, subtrees under their prefix path;
    /// paths join components with `/`. Content addressing makes the object
    /// graph acyclic, so the recursion always terminates.
    pub fn flatten_tree(
        &self,
        tree_oid: &ObjectId,
    ) -> anyhow::Result<BTreeMap<PathBuf, DatabaseEntry>> {
        let mut flattened = BTreeMap::new();
        self.flatten_tree_level(tree_oid, None, &mut flattened)?;
        Ok(flattened)
    }

    fn flatten_tree_level(
        &self,
        tree_oid: &ObjectId,
        prefix: Option<&Path>,
        flattened: &mut BTreeMap<PathBuf, DatabaseEntry>,
    ) -> anyhow::Result<()> {
        let tree = self.parse_object_as_tree(tree_oid)?.ok_or_else(|| {
            CoreError::Corrupt(format!("object {tree_oid} is not a tree"))
        })?;

        for (name, entry) in tree.into_entries() {
            let path = match prefix {
                Some(prefix) => prefix.join(&name),
                None => PathBuf::from(&name),
            };

            if entry.is_tree() {
                self.flatten_tree_level(&entry.oid, Some(&path), flattened)?;
            }
            flattened.insert(path, entry);
        }

        Ok(())
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_content = self.read_object(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let (object_type, declared_size) = ObjectType::parse_header(&mut object_reader)?;

        let payload_size = object_reader.get_ref().len() as u64 - object_reader.position();
        if payload_size != declared_size as u64 {
            return Err(CoreError::Corrupt(format!(
                "object {object_id} declares {declared_size} payload bytes but carries {payload_size}"
            ))
            .into());
        }

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        let object_content = std::fs::read(&object_path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                anyhow::Error::from(CoreError::NotFound(format!("object {object_id}")))
            } else {
                CoreError::Io {
                    path: object_path.clone(),
                    source: err,
                }
                .into()
            }
        })?;

        Self::decompress(object_content.into())
            .with_context(|| format!("Unable to decompress object {object_id}"))
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file into place so readers never observe a
        // partially written object
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .map_err(|_| CoreError::Corrupt("object is not valid zlib data".into()))?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// Find all objects whose OID starts with the given hex prefix
    ///
    /// Used to resolve abbreviated OIDs. For prefixes of 2+ characters only
    /// the matching fan-out directory is scanned; shorter prefixes fall back
    /// to scanning all 256 directories.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let mut matches = Vec::new();

        if prefix.len() >= 2 {
            let dir_name = &prefix[..2];
            let file_prefix = &prefix[2..];
            let dir_path = self.path.join(dir_name);

            if dir_path.is_dir() {
                for entry in std::fs::read_dir(&dir_path)? {
                    let entry = entry?;
                    let file_name = entry.file_name();
                    let file_name_str = file_name.to_string_lossy();

                    if file_name_str.starts_with(file_prefix) {
                        let full_oid = format!("{}{}", dir_name, file_name_str);
                        if let Ok(oid) = ObjectId::try_parse(full_oid) {
                            matches.push(oid);
                        }
                    }
                }
            }
        } else {
            for i in 0..=255 {
                let dir_name = format!("{:02x}", i);
                let dir_path = self.path.join(&dir_name);

                if dir_path.is_dir() {
                    for entry in std::fs::read_dir(&dir_path)? {
                        let entry = entry?;
                        let file_name = entry.file_name();
                        let file_name_str = file_name.to_string_lossy();
                        let full_oid = format!("{}{}", dir_name, file_name_str);

                        if full_oid.starts_with(prefix)
                            && let Ok(oid) = ObjectId::try_parse(full_oid)
                        {
                            matches.push(oid);
                        }
                    }
                }
            }
        }

        Ok(matches)
    }
}
