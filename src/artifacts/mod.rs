//! Data structures and algorithms
//!
//! The core types behind the repository areas:
//!
//! - `checkout`: tree materialization into the workspace
//! - `database`: database entry types
//! - `index`: index (staging area) wire format
//! - `objects`: object types (blob, tree, commit)
//! - `revision`: branch names and revision parsing/resolution
//! - `status`: working tree status inspection

pub mod checkout;
pub mod database;
pub mod index;
pub mod objects;
pub mod revision;
pub mod status;
