use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::status::report::Status;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Show the working tree status
    ///
    /// Prints the current branch (or the detached digest), then the staged,
    /// unstaged and untracked sections, or the clean-tree message when all
    /// three are empty.
    pub async fn status(&mut self) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let report = Status::new(self).assemble(&index)?;

        match &report.head {
            HeadState::Symbolic(branch) => {
                writeln!(self.writer(), "On branch {branch}")?;
            }
            HeadState::Detached(oid) => {
                writeln!(self.writer(), "HEAD detached at {oid}")?;
            }
        }
        if !report.has_commits {
            writeln!(self.writer(), "No commits yet")?;
        }

        if report.is_clean() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
            return Ok(());
        }

        if !report.staged.is_empty() {
            writeln!(self.writer(), "\n{}", "Changes to be committed:".bold())?;
            for (path, change) in &report.staged {
                writeln!(self.writer(), "\t{}{}", change.label(), path.display())?;
            }
        }

        if !report.unstaged.is_empty() {
            writeln!(
                self.writer(),
                "\n{}",
                "Changes not staged for commit:".bold()
            )?;
            writeln!(
                self.writer(),
                "\t(use \"grit add <file>...\" to update what will be committed)"
            )?;
            for (path, change) in &report.unstaged {
                writeln!(self.writer(), "\t{}{}", change.label(), path.display())?;
            }
        }

        if !report.untracked.is_empty() {
            writeln!(self.writer(), "\n{}", "Untracked files:".bold())?;
            for path in &report.untracked {
                writeln!(self.writer(), "\t{}", path.display().to_string().red())?;
            }
        }

        Ok(())
    }
}
