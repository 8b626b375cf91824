//! Working tree status
//!
//! The status engine runs the three-way comparison HEAD-tree ⇄ index ⇄
//! working tree and splits the result into staged changes, unstaged changes
//! and untracked files.

pub mod file_change;
pub mod report;
