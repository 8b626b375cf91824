//! Command implementations
//!
//! Commands come in two layers, following the usual split:
//!
//! - `plumbing`: low-level object and index manipulation (hash-object,
//!   cat-file, update-index, write-tree, read-tree, ls-tree)
//! - `porcelain`: user-facing workflows (init, add, commit, status,
//!   checkout, config)
//!
//! Every command is a method on [`crate::areas::repository::Repository`];
//! this is the only layer that prints.

pub mod plumbing;
pub mod porcelain;
