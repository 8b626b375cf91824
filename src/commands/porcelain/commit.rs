use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::tree::Tree;
use crate::errors::CoreError;
use std::io::Write;

impl Repository {
    /// Create a commit from the current index and advance HEAD
    ///
    /// Writes the tree snapshot, compares it against the HEAD commit's tree
    /// (an unchanged index produces no new commit), then writes the commit
    /// object and moves the current branch ref (or the detached HEAD).
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        if index.is_empty() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
            return Ok(());
        }

        let tree = Tree::build(index.entries())?;
        let tree_id = tree.object_id()?;

        let parent = self.refs().resolve_head()?;
        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };

        if let Some(parent_oid) = &parent {
            let parent_commit = self
                .database()
                .parse_object_as_commit(parent_oid)?
                .ok_or_else(|| {
                    CoreError::Corrupt(format!("HEAD commit {parent_oid} is unreadable"))
                })?;

            if parent_commit.tree_oid() == &tree_id {
                writeln!(self.writer(), "nothing to commit, working tree clean")?;
                return Ok(());
            }
        }

        tree.traverse(&|subtree| self.database().store(subtree.clone()))?;

        let author = self.load_author()?;
        let message = message.trim().to_string();

        let commit = Commit::new(parent.into_iter().collect(), tree_id, author, message);
        let commit_id = commit.object_id()?;
        self.database().store(commit.clone())?;
        self.refs().advance_head(&commit_id)?;

        writeln!(
            self.writer(),
            "[{}{}] {}",
            is_root,
            commit_id,
            commit.short_message()
        )?;

        Ok(())
    }

    /// Resolve the author identity
    ///
    /// `GIT_AUTHOR_NAME` / `GIT_AUTHOR_EMAIL` override the config's
    /// `user.name` / `user.email`; `GIT_AUTHOR_DATE` pins the timestamp,
    /// otherwise the current local time is used.
    fn load_author(&self) -> anyhow::Result<Author> {
        let name = std::env::var("GIT_AUTHOR_NAME")
            .ok()
            .or_else(|| self.config().get("user.name").ok())
            .ok_or_else(|| CoreError::NotFound("user.name is not configured".into()))?;
        let email = std::env::var("GIT_AUTHOR_EMAIL")
            .ok()
            .or_else(|| self.config().get("user.email").ok())
            .ok_or_else(|| CoreError::NotFound("user.email is not configured".into()))?;

        let timestamp = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Ok(Author::new_with_timestamp(name, email, ts)),
            None => Ok(Author::new(name, email)),
        }
    }
}
