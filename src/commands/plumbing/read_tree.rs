use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::revision::revision::Revision;

impl Repository {
    /// Replace the index with the blobs of a tree-ish
    ///
    /// The new entries carry the tree's modes and digests with zero stat
    /// fields; the working tree is not touched, and the next `add` re-stats
    /// whatever it touches.
    pub async fn read_tree(&mut self, treeish: &str) -> anyhow::Result<()> {
        let tree_oid = Revision::resolve_treeish(treeish, self)?;
        let flattened = self.database().flatten_tree(&tree_oid)?;

        let entries = flattened
            .into_iter()
            .filter(|(_, entry)| !entry.is_tree())
            .map(|(path, entry)| {
                IndexEntry::new(
                    path,
                    entry.oid,
                    EntryMetadata {
                        mode: entry.mode,
                        ..Default::default()
                    },
                )
            })
            .collect::<Vec<_>>();

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;
        index.replace_with(entries.into_iter());
        index.write_updates()?;

        Ok(())
    }
}
