use crate::areas::config::DEFAULT_CONFIG;
use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

const DEFAULT_HEAD: &str = "ref: refs/heads/master\n";

impl Repository {
    /// Create (or reinitialize) the control directory scaffold
    ///
    /// Lays out `objects/`, `refs/heads/`, `refs/tags/`, a symbolic HEAD on
    /// `master` and a default config. Reinitializing an existing repository
    /// recreates missing pieces but leaves existing state alone.
    pub async fn init(&mut self) -> anyhow::Result<()> {
        let git_path = self.git_path();
        let reinitialized = git_path.exists();

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create objects directory")?;
        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create refs/heads directory")?;
        fs::create_dir_all(self.refs().tags_path())
            .context("Failed to create refs/tags directory")?;

        let head_path = self.refs().head_path();
        if !head_path.exists() {
            fs::write(&head_path, DEFAULT_HEAD).context("Failed to write HEAD file")?;
        }

        let config_path = git_path.join("config");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG).context("Failed to write config file")?;
        }

        if reinitialized {
            writeln!(
                self.writer(),
                "Reinitialized existing Git repository in {}",
                git_path.display()
            )?;
        } else {
            writeln!(
                self.writer(),
                "Initialized empty Git repository in {}",
                git_path.display()
            )?;
        }

        Ok(())
    }
}
