//! Tree materialization
//!
//! Writes a commit's tree into the working directory and rebuilds the index
//! from the flattened entries. Materialization is best-effort under the
//! single-writer contract: a fatal error aborts the command and may leave
//! the working directory partially updated, which is documented behavior.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::CoreError;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Materializes trees into the workspace
#[derive(new)]
pub struct Materializer<'r> {
    repository: &'r Repository,
}

impl<'r> Materializer<'r> {
    /// Materialize a commit's whole tree
    ///
    /// Working files tracked by the current index but absent from the target
    /// tree are removed first; then every blob of the target is written
    /// (parent directories created as needed) and the index is rebuilt from
    /// the flattened tree with freshly captured stats.
    pub fn materialize_commit(
        &self,
        commit_oid: &ObjectId,
        index: &mut Index,
    ) -> anyhow::Result<()> {
        let flattened = self.flatten_commit(commit_oid)?;

        let stale = index
            .entries()
            .map(|entry| entry.name.clone())
            .filter(|name| !flattened.contains_key(name.as_path()))
            .collect::<Vec<_>>();
        for path in stale {
            self.repository.workspace().remove_file(&path)?;
        }

        let mut new_entries = Vec::with_capacity(flattened.len());
        for (path, entry) in &flattened {
            if entry.is_tree() {
                continue;
            }

            let data = self.load_blob_data(&entry.oid)?;
            self.repository
                .workspace()
                .write_file(path, &data, entry.mode)?;

            let stat = self
                .repository
                .workspace()
                .stat_file(path)
                .with_context(|| format!("failed to stat materialized file {path:?}"))?;
            new_entries.push(IndexEntry::new(path.clone(), entry.oid.clone(), stat));
        }

        index.replace_with(new_entries.into_iter());

        Ok(())
    }

    /// Restore specific paths from a commit, leaving HEAD alone
    ///
    /// Paths present in the commit's tree overwrite the working file and the
    /// index entry; paths absent from it are removed from both. The restored
    /// index entries carry zero stat fields, which the next `add` re-stats
    /// and normalizes.
    pub fn restore_paths(
        &self,
        commit_oid: &ObjectId,
        paths: &[PathBuf],
        index: &mut Index,
    ) -> anyhow::Result<()> {
        let flattened = self.flatten_commit(commit_oid)?;

        for path in paths {
            match flattened.get(path.as_path()) {
                Some(entry) if !entry.is_tree() => {
                    let data = self.load_blob_data(&entry.oid)?;
                    self.repository
                        .workspace()
                        .write_file(path, &data, entry.mode)?;

                    index.add(IndexEntry::new(
                        path.clone(),
                        entry.oid.clone(),
                        EntryMetadata {
                            mode: entry.mode,
                            ..Default::default()
                        },
                    ));
                }
                _ => {
                    self.repository.workspace().remove_file(path)?;
                    index.remove(path.clone());
                }
            }
        }

        Ok(())
    }

    fn flatten_commit(
        &self,
        commit_oid: &ObjectId,
    ) -> anyhow::Result<BTreeMap<PathBuf, DatabaseEntry>> {
        let commit = self
            .repository
            .database()
            .parse_object_as_commit(commit_oid)?
            .ok_or_else(|| {
                CoreError::InvalidArgument(format!("object {commit_oid} is not a commit"))
            })?;

        self.repository.database().flatten_tree(commit.tree_oid())
    }

    fn load_blob_data(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        let blob = self
            .repository
            .database()
            .parse_object_as_blob(oid)?
            .ok_or_else(|| CoreError::Corrupt(format!("tree references {oid}, which is not a blob")))?;

        Ok(blob.content().clone())
    }
}

/// Normalize a user-supplied path into the index's canonical form:
/// relative, `/`-separated, free of `.` and `..` components.
pub fn normalize_path(raw: &str) -> anyhow::Result<PathBuf> {
    let path = Path::new(raw);

    if path.is_absolute() {
        return Err(CoreError::InvalidArgument(format!(
            "absolute paths are not supported: {raw}"
        ))
        .into());
    }

    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                if !cleaned.pop() {
                    return Err(CoreError::InvalidArgument(format!(
                        "path escapes the repository root: {raw}"
                    ))
                    .into());
                }
            }
            std::path::Component::Normal(part) => cleaned.push(part),
            _ => {
                return Err(
                    CoreError::InvalidArgument(format!("unsupported path: {raw}")).into(),
                );
            }
        }
    }

    if cleaned.as_os_str().is_empty() {
        return Err(CoreError::InvalidArgument(format!("empty path: {raw}")).into());
    }

    Ok(cleaned)
}
