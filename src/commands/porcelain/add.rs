use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::materializer::normalize_path;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use std::collections::BTreeSet;
use std::path::Path;

impl Repository {
    /// Stage files into the index
    ///
    /// `add .` walks the whole working directory and additionally removes
    /// index entries whose files are gone; explicit paths only ever add or
    /// update, never delete. A path that cannot be stat'ed is skipped, which
    /// is what the user means when a listed file has just been removed.
    pub async fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        let add_all = paths.iter().any(|path| path == ".");

        if add_all {
            let mut working_set = BTreeSet::new();

            for path in self.workspace().list_files(None)? {
                working_set.insert(path.clone());
                self.add_or_update_path(&path, &mut index)?;
            }

            // only `add .` sweeps deletions out of the index
            let stale = index
                .entries()
                .map(|entry| entry.name.clone())
                .filter(|name| !working_set.contains(name))
                .collect::<Vec<_>>();
            for name in stale {
                index.remove(name);
            }
        } else {
            for raw_path in paths {
                let path = normalize_path(raw_path)?;

                if self.path().join(&path).is_dir() {
                    for file in self
                        .workspace()
                        .list_files(Some(self.path().join(&path)))?
                    {
                        self.add_or_update_path(&file, &mut index)?;
                    }
                } else {
                    self.add_or_update_path(&path, &mut index)?;
                }
            }
        }

        index.write_updates()?;

        Ok(())
    }

    /// Stage one file, re-hashing only when the stat cache says it changed
    fn add_or_update_path(&self, path: &Path, index: &mut Index) -> anyhow::Result<()> {
        // stat failure means "skip": the file vanished or never existed
        let Ok(stat) = self.workspace().stat_file(path) else {
            return Ok(());
        };
        if stat.mode.is_tree() {
            return Ok(());
        }

        if let Some(existing) = index.entry_by_path(path)
            && existing.stat_match(&stat)
            && existing.times_match(&stat)
        {
            return Ok(());
        }

        let blob = self.workspace().parse_blob(path)?;
        let blob_id = blob.object_id()?;

        self.database().store(blob)?;
        index.add(IndexEntry::new(path.to_path_buf(), blob_id, stat));

        Ok(())
    }
}
