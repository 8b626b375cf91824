use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::tree::Tree;
use crate::errors::CoreError;
use std::io::Write;

impl Repository {
    /// Write the current index as tree objects, printing the root digest
    pub async fn write_tree(&mut self) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if index.is_empty() {
            return Err(CoreError::InvalidArgument(
                "the index is empty; nothing to write".into(),
            )
            .into());
        }

        let tree = Tree::build(index.entries())?;
        tree.traverse(&|subtree| self.database().store(subtree.clone()))?;

        writeln!(self.writer(), "{}", tree.object_id()?)?;

        Ok(())
    }
}
