use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// A (mode, digest) pair as stored in a tree entry.
///
/// This is the read-side counterpart of an index entry: what a tree knows
/// about each of its children, keyed by name in the tree itself and by full
/// path once a tree has been flattened.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct DatabaseEntry {
    pub oid: ObjectId,
    pub mode: EntryMode,
}

impl DatabaseEntry {
    pub fn is_tree(&self) -> bool {
        self.mode.is_tree()
    }
}
