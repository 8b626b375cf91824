//! Object identifier (SHA-1 digest)
//!
//! Object IDs are 160-bit digests, written as 40 hexadecimal characters in
//! text contexts (refs, commit headers) and as 20 raw bytes in binary
//! contexts (tree entries, the index).
//!
//! ## Storage
//!
//! Objects live at `.git/objects/<first-2-chars>/<remaining-38-chars>`.

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_RAW_LENGTH};
use crate::errors::CoreError;
use std::io;
use std::path::PathBuf;

/// A validated 40-character hexadecimal object ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// # Arguments
    ///
    /// * `id` - 40-character hexadecimal string
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(CoreError::InvalidArgument(format!(
                "invalid object ID length: {}",
                id.len()
            ))
            .into());
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidArgument(format!("invalid object ID: {id}")).into());
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Write the object ID in binary form (20 raw bytes)
    ///
    /// Used when serializing tree entries and index entries.
    pub fn write_h40_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        let hex40 = self.as_ref();

        // a byte per hex pair
        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&hex40[i..i + 2], 16)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "Invalid hex digit"))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }

    /// Read an object ID from binary form (20 raw bytes)
    ///
    /// Used when deserializing tree entries and index entries.
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut hex40 = String::with_capacity(OBJECT_ID_LENGTH);
        let mut buffer = [0; 1];

        for _ in 0..OBJECT_ID_RAW_LENGTH {
            reader.read_exact(&mut buffer)?;
            let hex_pair = &format!("{:02x}", u8::from_be_bytes(buffer));
            hex40.push_str(hex_pair);
        }

        Self::try_parse(hex40)
    }

    /// Convert to the file system path used for object storage
    ///
    /// Splits the digest as `XX/YYYY…`: `abc123…` becomes `ab/c123…`.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// Get the abbreviated form of the object ID (first 7 characters)
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
