//! Configuration collaborator
//!
//! `.git/config` is an INI-style file of `[section]` headers and
//! `key = value` lines. The core treats it as an opaque key/value store
//! addressed by dotted `section.name` keys and only ever consumes
//! `user.name` and `user.email`; everything else is carried verbatim.

use crate::errors::CoreError;
use anyhow::Context;
use derive_new::new;
use std::fmt::Write as _;
use std::path::Path;

/// Default content written by `init`
pub const DEFAULT_CONFIG: &str = "[core]\n\
    \trepositoryformatversion = 0\n\
    \tfilemode = true\n\
    \tbare = false\n\
    [user]\n\
    \tname = username\n\
    \temail = user@email.com\n";

/// Matches `[section]` header lines
const SECTION_REGEX: &str = r"^\[([A-Za-z0-9_.-]+)\]$";

/// INI-style key/value store backed by `.git/config`
#[derive(Debug, new)]
pub struct Config {
    /// Path to the config file
    path: Box<Path>,
}

impl Config {
    /// Fetch the value for a dotted `section.name` key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        let (section, name) = Self::split_key(key)?;
        let content = self.read_content()?;

        Self::lookup(&content, &section, &name)
            .ok_or_else(|| CoreError::NotFound(format!("config key {key}")).into())
    }

    /// Set the value for a dotted `section.name` key, creating the section
    /// if needed; the file is rewritten whole
    pub fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let (section, name) = Self::split_key(key)?;
        let content = self.read_content()?;

        let section_re = regex::Regex::new(SECTION_REGEX).context("invalid section regex")?;

        let mut output = String::new();
        let mut current_section = String::new();
        let mut written = false;

        for line in content.lines() {
            let trimmed = line.trim();

            if let Some(captures) = section_re.captures(trimmed) {
                // leaving the target section without a hit appends the key
                if current_section == section && !written {
                    writeln!(output, "\t{name} = {value}")?;
                    written = true;
                }
                current_section = captures[1].to_string();
            } else if current_section == section
                && let Some((existing_key, _)) = trimmed.split_once('=')
                && existing_key.trim() == name
            {
                if !written {
                    writeln!(output, "\t{name} = {value}")?;
                    written = true;
                }
                continue;
            }

            output.push_str(line);
            output.push('\n');
        }

        if !written {
            if current_section != section {
                writeln!(output, "[{section}]")?;
            }
            writeln!(output, "\t{name} = {value}")?;
        }

        std::fs::write(&self.path, output)
            .with_context(|| format!("failed to write config file at {:?}", self.path))?;

        Ok(())
    }

    fn lookup(content: &str, section: &str, name: &str) -> Option<String> {
        let section_re = regex::Regex::new(SECTION_REGEX).ok()?;
        let mut current_section = String::new();

        for line in content.lines() {
            let trimmed = line.trim();

            if let Some(captures) = section_re.captures(trimmed) {
                current_section = captures[1].to_string();
            } else if current_section == section
                && let Some((key, value)) = trimmed.split_once('=')
                && key.trim() == name
            {
                return Some(value.trim().to_string());
            }
        }

        None
    }

    fn split_key(key: &str) -> anyhow::Result<(String, String)> {
        match key.split_once('.') {
            Some((section, name)) if !section.is_empty() && !name.is_empty() => {
                Ok((section.to_string(), name.to_string()))
            }
            _ => Err(CoreError::InvalidArgument(format!("invalid config key: {key}")).into()),
        }
    }

    fn read_content(&self) -> anyhow::Result<String> {
        if !self.path.exists() {
            return Ok(String::new());
        }

        std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read config file at {:?}", self.path))
    }
}
