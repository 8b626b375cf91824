//! Status report assembly
//!
//! Builds the three change sets:
//!
//! - **staged**: HEAD tree ⇄ index (Added / Modified / Deleted)
//! - **unstaged**: index ⇄ working tree (Modified / Deleted)
//! - **untracked**: working tree files the index does not know
//!
//! Working-tree digests come from the pure hash function; nothing is written
//! to the object store. Files whose cached stat fields and timestamps match
//! the index are not re-hashed.

use crate::areas::index::Index;
use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// The assembled status of the repository
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// Current HEAD shape (branch or detached digest)
    pub head: HeadState,
    /// False until the first commit exists
    pub has_commits: bool,
    /// HEAD tree ⇄ index differences, by path
    pub staged: BTreeMap<PathBuf, IndexChangeType>,
    /// Index ⇄ working tree differences, by path
    pub unstaged: BTreeMap<PathBuf, WorkspaceChangeType>,
    /// Working-tree paths absent from the index
    pub untracked: BTreeSet<PathBuf>,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty() && self.untracked.is_empty()
    }
}

/// Status engine bound to one repository
#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    /// Run the three-way comparison against the given (rehydrated) index
    pub fn assemble(&self, index: &Index) -> anyhow::Result<StatusReport> {
        let head = self.repository.refs().read_head()?;
        let head_files = self.load_head_files()?;
        let has_commits = self.repository.refs().resolve_head()?.is_some();

        let worktree_digests = self.digest_worktree(index)?;

        let mut staged = BTreeMap::new();
        for entry in index.entries() {
            match head_files.get(&entry.name) {
                None => {
                    staged.insert(entry.name.clone(), IndexChangeType::Added);
                }
                Some(head_entry)
                    if head_entry.oid != entry.oid || head_entry.mode != entry.metadata.mode =>
                {
                    staged.insert(entry.name.clone(), IndexChangeType::Modified);
                }
                Some(_) => {}
            }
        }
        for path in head_files.keys() {
            if index.entry_by_path(path).is_none() {
                staged.insert(path.clone(), IndexChangeType::Deleted);
            }
        }

        let mut unstaged = BTreeMap::new();
        for entry in index.entries() {
            match worktree_digests.get(&entry.name) {
                None => {
                    unstaged.insert(entry.name.clone(), WorkspaceChangeType::Deleted);
                }
                Some(worktree_oid) if *worktree_oid != entry.oid => {
                    unstaged.insert(entry.name.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }

        let untracked = worktree_digests
            .keys()
            .filter(|path| index.entry_by_path(path).is_none())
            .cloned()
            .collect::<BTreeSet<_>>();

        Ok(StatusReport {
            head,
            has_commits,
            staged,
            unstaged,
            untracked,
        })
    }

    /// Flatten the HEAD tree into its blob entries, empty before the first
    /// commit
    fn load_head_files(&self) -> anyhow::Result<BTreeMap<PathBuf, DatabaseEntry>> {
        let Some(head_oid) = self.repository.refs().resolve_head()? else {
            return Ok(BTreeMap::new());
        };

        let commit = self
            .repository
            .database()
            .parse_object_as_commit(&head_oid)?
            .ok_or_else(|| anyhow::anyhow!("HEAD does not point at a commit"))?;

        Ok(self
            .repository
            .database()
            .flatten_tree(commit.tree_oid())?
            .into_iter()
            .filter(|(_, entry)| !entry.is_tree())
            .collect())
    }

    /// Digest every working-tree file
    ///
    /// An index entry whose stat cache (including nanosecond timestamps)
    /// matches the file on disk keeps its recorded digest without re-reading
    /// the content.
    fn digest_worktree(&self, index: &Index) -> anyhow::Result<BTreeMap<PathBuf, ObjectId>> {
        let mut digests = BTreeMap::new();

        for path in self.repository.workspace().list_files(None)? {
            let cached = index.entry_by_path(&path).and_then(|entry| {
                let stat = self.repository.workspace().stat_file(&path).ok()?;
                (entry.stat_match(&stat) && entry.times_match(&stat)).then(|| entry.oid.clone())
            });

            let digest = match cached {
                Some(oid) => oid,
                None => self
                    .repository
                    .workspace()
                    .parse_blob(&path)?
                    .object_id()?,
            };

            digests.insert(path, digest);
        }

        Ok(digests)
    }
}
