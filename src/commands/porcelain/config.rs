use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Print the value stored under a dotted `section.name` key
    pub fn config_get(&mut self, key: &str) -> anyhow::Result<()> {
        let value = self.config().get(key)?;
        writeln!(self.writer(), "{value}")?;

        Ok(())
    }

    /// Store a value under a dotted `section.name` key
    pub fn config_set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.config().set(key, value)
    }
}
