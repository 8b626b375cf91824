//! Low-level commands for direct object and index manipulation

pub mod cat_file;
pub mod hash_object;
pub mod ls_tree;
pub mod read_tree;
pub mod update_index;
pub mod write_tree;
