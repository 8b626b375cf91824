use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::revision::Revision;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// List the contents of a tree-ish
    ///
    /// - no flags: one level
    /// - `-r`: recurse into subtrees, listing blobs
    /// - `-t`: with `-r`, include the subtrees themselves
    /// - `-d`: only subtrees (implies `-t`)
    pub fn ls_tree(
        &mut self,
        treeish: &str,
        dirs_only: bool,
        recursive: bool,
        with_trees: bool,
    ) -> anyhow::Result<()> {
        let tree_oid = Revision::resolve_treeish(treeish, self)?;
        let flattened = self.database().flatten_tree(&tree_oid)?;

        // the flat map is keyed by path, so iteration is already sorted
        for (path, entry) in &flattened {
            let top_level = path.parent() == Some(Path::new(""));

            let listed = if recursive {
                if dirs_only {
                    entry.is_tree()
                } else if with_trees {
                    true
                } else {
                    !entry.is_tree()
                }
            } else if dirs_only {
                entry.is_tree() && top_level
            } else {
                top_level
            };

            if listed {
                self.print_tree_entry(path, entry)?;
            }
        }

        Ok(())
    }

    fn print_tree_entry(&self, path: &Path, entry: &DatabaseEntry) -> anyhow::Result<()> {
        let object_type = if entry.is_tree() {
            ObjectType::Tree
        } else {
            ObjectType::Blob
        };

        writeln!(
            self.writer(),
            "{:06o} {} {}\t{}",
            entry.mode.as_u32(),
            object_type.as_str(),
            entry.oid.as_ref(),
            path.display()
        )?;

        Ok(())
    }
}
