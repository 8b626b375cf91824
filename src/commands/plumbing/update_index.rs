use crate::areas::repository::Repository;
use crate::artifacts::checkout::materializer::normalize_path;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// `update-index --cacheinfo <mode> <object> <path>`
    ///
    /// Injects an entry straight into the index: the mode must be one of
    /// the recognized encodings and the object a full digest. Inserts or
    /// replaces by name, idempotently, without touching the working tree.
    pub async fn update_index_cacheinfo(
        &mut self,
        mode: &str,
        object: &str,
        path: &str,
    ) -> anyhow::Result<()> {
        let mode = EntryMode::from_octal_str(mode)?;
        let oid = ObjectId::try_parse(object.to_string())?;
        let path = normalize_path(path)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        index.add(IndexEntry::new(
            path,
            oid,
            EntryMetadata {
                mode,
                ..Default::default()
            },
        ));

        index.write_updates()?;

        Ok(())
    }
}
