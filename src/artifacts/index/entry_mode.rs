//! File-type/permission encodings shared by tree entries and the index
//!
//! The recognized modes are exactly:
//! - `0o100644` regular file
//! - `0o100755` executable file
//! - `0o120000` symbolic link
//! - `0o040000` subtree
//!
//! Anything else in a tree or index is a corruption error, never a panic.
//! When rendered into a tree object the subtree mode loses its leading zero
//! (`40000`), which is part of the canonical serialization and therefore of
//! every tree's digest.

use crate::errors::CoreError;

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
}

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd)]
pub enum EntryMode {
    File(FileMode),
    Symlink,
    #[default]
    Directory,
}

impl EntryMode {
    /// Render the mode the way tree objects store it: octal, no leading zero
    pub fn as_str(&self) -> &str {
        match self {
            EntryMode::File(FileMode::Regular) => "100644",
            EntryMode::File(FileMode::Executable) => "100755",
            EntryMode::Symlink => "120000",
            EntryMode::Directory => "40000",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::Symlink => 0o120000,
            EntryMode::Directory => 0o40000,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    /// Parse a mode from its tree-object rendering.
    ///
    /// Accepts the zero-padded directory form (`040000`) on input for
    /// tolerance, but [`EntryMode::as_str`] always renders the canonical
    /// unpadded form.
    pub fn from_octal_str(value: &str) -> anyhow::Result<Self> {
        match value {
            "100644" => Ok(EntryMode::File(FileMode::Regular)),
            "100755" => Ok(EntryMode::File(FileMode::Executable)),
            "120000" => Ok(EntryMode::Symlink),
            "40000" | "040000" => Ok(EntryMode::Directory),
            other => Err(CoreError::Corrupt(format!("unrecognized entry mode: {other}")).into()),
        }
    }
}

impl TryFrom<u32> for EntryMode {
    type Error = anyhow::Error;

    fn try_from(mode: u32) -> anyhow::Result<Self> {
        match mode {
            0o100644 => Ok(EntryMode::File(FileMode::Regular)),
            0o100755 => Ok(EntryMode::File(FileMode::Executable)),
            0o120000 => Ok(EntryMode::Symlink),
            0o40000 => Ok(EntryMode::Directory),
            other => {
                Err(CoreError::Corrupt(format!("unrecognized entry mode: {other:o}")).into())
            }
        }
    }
}

impl From<FileMode> for EntryMode {
    fn from(mode: FileMode) -> Self {
        EntryMode::File(mode)
    }
}

impl TryFrom<EntryMode> for FileMode {
    type Error = anyhow::Error;

    fn try_from(value: EntryMode) -> anyhow::Result<Self> {
        match value {
            EntryMode::File(mode) => Ok(mode),
            _ => Err(CoreError::InvalidArgument("entry mode is not a file mode".into()).into()),
        }
    }
}
