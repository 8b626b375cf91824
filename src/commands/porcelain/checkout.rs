use crate::areas::repository::Repository;
use crate::artifacts::checkout::materializer::{Materializer, normalize_path};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::revision::branch_name::BranchName;
use crate::artifacts::revision::revision::Revision;
use crate::errors::CoreError;

const DETACHMENT_NOTICE: &str = r#"
You are in 'detached HEAD' state. You can look around, make experimental
changes and commit them, and you can discard any commits you make in this
state without impacting any branches by performing another checkout.

If you want to create a new branch to retain commits you create, you may
do so (now or later) by using the checkout command with -b.
"#;

impl Repository {
    /// Switch branches, detach HEAD, or restore paths
    ///
    /// Three modes:
    /// 1. `-b <branch> [<start-point>]` creates the branch at the start
    ///    point (default HEAD), attaches HEAD to it and materializes;
    /// 2. `<commit-ish>` materializes that commit, leaving HEAD symbolic
    ///    when the argument is a live branch and detaching it otherwise;
    /// 3. `<commit-ish> -- <paths…>` restores the listed paths without
    ///    moving HEAD.
    pub async fn checkout(
        &mut self,
        new_branch: Option<&str>,
        target: Option<&str>,
        paths: &[String],
    ) -> anyhow::Result<()> {
        match (new_branch, paths.is_empty()) {
            (Some(branch), _) => self.checkout_new_branch(branch, target).await,
            (None, false) => {
                let target = target.ok_or_else(|| {
                    CoreError::InvalidArgument("checkout -- <paths> needs a commit-ish".into())
                })?;
                self.checkout_paths(target, paths).await
            }
            (None, true) => {
                let target = target.ok_or_else(|| {
                    CoreError::InvalidArgument("checkout needs a commit-ish".into())
                })?;
                self.checkout_target(target).await
            }
        }
    }

    async fn checkout_new_branch(
        &mut self,
        branch: &str,
        start_point: Option<&str>,
    ) -> anyhow::Result<()> {
        let branch = BranchName::try_parse(branch.to_string())?;
        let start_point = start_point.unwrap_or("HEAD");
        let commit_oid = Revision::try_parse(start_point)?.resolve(self)?;

        self.refs().create_branch(&branch, &commit_oid)?;

        self.materialize(&commit_oid).await?;
        self.refs().set_head_symbolic(&branch)?;

        eprintln!("Switched to a new branch '{branch}'");

        Ok(())
    }

    async fn checkout_target(&mut self, target: &str) -> anyhow::Result<()> {
        // a live branch name keeps HEAD symbolic; anything else detaches it
        let live_branch = BranchName::try_parse(target.to_string())
            .ok()
            .filter(|branch| {
                matches!(self.refs().read_branch(branch), Ok(Some(_)))
            });

        match live_branch {
            Some(branch) => {
                let Some(commit_oid) = self.refs().read_branch(&branch)? else {
                    return Err(CoreError::NotFound(format!("branch {branch} not found")).into());
                };

                self.materialize(&commit_oid).await?;
                self.refs().set_head_symbolic(&branch)?;

                eprintln!("Switched to branch '{branch}'");
            }
            None => {
                let commit_oid = Revision::try_parse(target)?.resolve(self)?;

                self.materialize(&commit_oid).await?;
                self.refs().update_head_detached(&commit_oid)?;

                eprintln!("Note: checking out '{target}'.\n{DETACHMENT_NOTICE}");
                self.print_head_position("HEAD is now at", &commit_oid)?;
            }
        }

        Ok(())
    }

    async fn checkout_paths(&mut self, target: &str, paths: &[String]) -> anyhow::Result<()> {
        let commit_oid = Revision::try_parse(target)?.resolve(self)?;

        let paths = paths
            .iter()
            .map(|raw| normalize_path(raw))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        Materializer::new(self).restore_paths(&commit_oid, &paths, &mut index)?;

        index.write_updates()?;

        Ok(())
    }

    async fn materialize(&self, commit_oid: &ObjectId) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        Materializer::new(self).materialize_commit(commit_oid, &mut index)?;

        index.write_updates()
    }

    fn print_head_position(&self, message: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let commit = self
            .database()
            .parse_object_as_commit(oid)?
            .ok_or_else(|| CoreError::Corrupt(format!("object {oid} is not a commit")))?;

        eprintln!("{} {} {}", message, oid.to_short_oid(), commit.short_message());
        Ok(())
    }
}
