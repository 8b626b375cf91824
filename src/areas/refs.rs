//! References (branches and HEAD)
//!
//! References are human-readable names pointing at commits, stored as small
//! text files whose sole content is a 40-character digest followed by a
//! newline. HEAD is special: it is either *symbolic* (`ref: refs/heads/<b>`,
//! following the named branch) or *detached* (a digest directly).
//!
//! A symbolic HEAD may legally point at a branch file that does not exist
//! yet; that is the state of a fresh repository before its first commit.
//! A detached HEAD naming a missing object is corruption and surfaces as an
//! error when resolved.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::revision::branch_name::BranchName;
use crate::errors::CoreError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;

/// Name of the HEAD reference file
pub const HEAD_REF_NAME: &str = "HEAD";

/// Prefix marking a symbolic HEAD
const SYMREF_PREFIX: &str = "ref: refs/heads/";

/// The two shapes HEAD can take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// HEAD follows a branch; the branch file may not exist yet
    Symbolic(BranchName),
    /// HEAD points at a commit directly
    Detached(ObjectId),
}

/// Reference store rooted at the control directory
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the control directory (typically `.git`)
    path: Box<Path>,
}

impl Refs {
    /// Read and classify HEAD
    pub fn read_head(&self) -> anyhow::Result<HeadState> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;
        let content = content.trim();

        if let Some(branch) = content.strip_prefix(SYMREF_PREFIX) {
            Ok(HeadState::Symbolic(BranchName::try_parse(
                branch.to_string(),
            )?))
        } else if let Ok(oid) = ObjectId::try_parse(content.to_string()) {
            Ok(HeadState::Detached(oid))
        } else {
            Err(CoreError::Corrupt(format!("bad HEAD content: {content:?}")).into())
        }
    }

    /// Resolve HEAD to a commit digest
    ///
    /// Returns `None` when HEAD is symbolic and the branch has no commits
    /// yet.
    pub fn resolve_head(&self) -> anyhow::Result<Option<ObjectId>> {
        match self.read_head()? {
            HeadState::Symbolic(branch) => self.read_branch(&branch),
            HeadState::Detached(oid) => Ok(Some(oid)),
        }
    }

    /// Read a branch ref, `None` if the branch file does not exist
    pub fn read_branch(&self, name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.heads_path().join(name.as_ref());
        if !branch_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;
        let oid = ObjectId::try_parse(content.trim().to_string())
            .map_err(|_| CoreError::Corrupt(format!("bad content in ref {name}")))?;

        Ok(Some(oid))
    }

    /// Point a branch at a commit, creating the ref file if needed
    pub fn update_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.as_ref()).into_boxed_path();
        self.update_ref_file(branch_path, format!("{}\n", oid.as_ref()))
    }

    /// Create a branch pointing at a commit; existing branches are refused
    pub fn create_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.as_ref()).into_boxed_path();

        if branch_path.exists() {
            return Err(CoreError::Conflict(format!("branch {name} already exists")).into());
        }

        self.update_ref_file(branch_path, format!("{}\n", oid.as_ref()))
    }

    /// Detach HEAD at a commit
    pub fn update_head_detached(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(self.head_path(), format!("{}\n", oid.as_ref()))
    }

    /// Make HEAD follow a branch
    pub fn set_head_symbolic(&self, branch: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(
            self.head_path(),
            format!("{SYMREF_PREFIX}{}\n", branch.as_ref()),
        )
    }

    /// Advance whatever HEAD designates to a new commit
    ///
    /// With a symbolic HEAD the branch ref moves; with a detached HEAD the
    /// HEAD file itself is rewritten.
    pub fn advance_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        match self.read_head()? {
            HeadState::Symbolic(branch) => self.update_branch(&branch, oid),
            HeadState::Detached(_) => self.update_head_detached(oid),
        }
    }

    /// Rewrite a ref file whole, under an exclusive lock
    fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.clone())
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    pub fn tags_path(&self) -> Box<Path> {
        self.refs_path().join("tags").into_boxed_path()
    }
}
