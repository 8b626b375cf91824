//! Branch names and revision resolution
//!
//! Handles:
//! - Branch name validation
//! - Revision ("commit-ish" / "tree-ish") grammar parsing
//! - Resolution of parsed revisions against the repository
//!
//! ## Revision Syntax
//!
//! - Branch names: `main`, `feature/new-feature`
//! - `HEAD`, and the `@` alias for it
//! - First-parent notation: `HEAD^` (equivalent to `^1`)
//! - Nth-parent notation: `HEAD^2` (1-based; `^0` is invalid)
//! - Ancestor notation: `HEAD~3` (follows first parents; `~` alone is `~1`)
//! - Object IDs: full 40-character digests, or unique hex prefixes
//! - Suffixes compose left to right: `main~2^2~1`

pub mod branch_name;
pub mod revision;

/// Characters and shapes a branch name must not contain
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Nth-parent notation (e.g. `HEAD^2`)
pub const NTH_PARENT_REGEX: &str = r"^(.+)\^(\d+)$";

/// First-parent notation (e.g. `HEAD^`)
pub const PARENT_REGEX: &str = r"^(.+)\^$";

/// Ancestor notation with a count (e.g. `HEAD~3`)
pub const ANCESTOR_REGEX: &str = r"^(.+)\~(\d+)$";

/// Ancestor notation without a count (`HEAD~`, meaning `~1`)
pub const BARE_ANCESTOR_REGEX: &str = r"^(.+)\~$";

/// Revision aliases and their expansions
pub const REF_ALIASES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "@" => "HEAD",
};

/// The literal tree-ish form naming the HEAD commit's tree
pub const HEAD_TREE_LITERAL: &str = "HEAD^{tree}";
