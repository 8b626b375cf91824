//! Revision grammar and resolution
//!
//! A revision is `<base>(<suffix>)*` where the base names a commit (`HEAD`,
//! a branch, a digest or a unique digest prefix) and each suffix steps
//! through the graph: `~N` follows first parents N times, `^N` takes the
//! Nth parent (1-based) of the current commit.
//!
//! Parsing peels suffixes off the right end recursively, so `main~2^2`
//! becomes `Parent(Ancestor(Ref("main"), 2), 2)` and resolution naturally
//! applies the suffixes left to right.

use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::branch_name::BranchName;
use crate::artifacts::revision::{
    ANCESTOR_REGEX, BARE_ANCESTOR_REGEX, HEAD_TREE_LITERAL, NTH_PARENT_REGEX, PARENT_REGEX,
    REF_ALIASES,
};
use crate::errors::CoreError;
use anyhow::Context;

/// A parsed revision specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    /// `HEAD`, resolved through the ref store
    Head,
    /// A branch name, or (as a fallback during resolution) an object ID
    Ref(BranchName),
    /// The Nth first-parent ancestor of a revision (e.g. `HEAD~3`)
    Ancestor(Box<Revision>, usize),
    /// The Nth parent of a revision (e.g. `HEAD^2`; plain `^` is `^1`)
    Parent(Box<Revision>, usize),
}

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        if let Some((base, n)) = Self::match_suffix(revision, NTH_PARENT_REGEX)? {
            if n == 0 {
                return Err(CoreError::InvalidArgument(format!(
                    "^0 is not a valid parent selector in {revision:?}"
                ))
                .into());
            }
            Ok(Revision::Parent(Box::new(Self::try_parse(&base)?), n))
        } else if let Some((base, _)) = Self::match_suffix(revision, PARENT_REGEX)? {
            Ok(Revision::Parent(Box::new(Self::try_parse(&base)?), 1))
        } else if let Some((base, n)) = Self::match_suffix(revision, ANCESTOR_REGEX)? {
            Ok(Revision::Ancestor(Box::new(Self::try_parse(&base)?), n))
        } else if let Some((base, _)) = Self::match_suffix(revision, BARE_ANCESTOR_REGEX)? {
            Ok(Revision::Ancestor(Box::new(Self::try_parse(&base)?), 1))
        } else {
            let resolved_name = *REF_ALIASES.get(revision).unwrap_or(&revision);
            if resolved_name == HEAD_REF_NAME {
                return Ok(Revision::Head);
            }

            let branch_name = BranchName::try_parse(resolved_name.to_string())?;
            Ok(Revision::Ref(branch_name))
        }
    }

    /// Match `<base><op><N?>` against one suffix pattern.
    ///
    /// Returns the base text and the parsed count (1 when the pattern has no
    /// count group).
    fn match_suffix(revision: &str, pattern: &str) -> anyhow::Result<Option<(String, usize)>> {
        let re = regex::Regex::new(pattern)
            .with_context(|| format!("invalid revision regex: {pattern}"))?;

        match re.captures(revision) {
            None => Ok(None),
            Some(caps) => {
                let base = caps[1].to_string();
                let n = match caps.get(2) {
                    None => 1,
                    Some(digits) => digits.as_str().parse().with_context(|| {
                        format!("failed to parse generation count in revision: {revision}")
                    })?,
                };
                Ok(Some((base, n)))
            }
        }
    }

    /// Resolve this revision to a commit digest
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Head => repository
                .refs()
                .resolve_head()?
                .ok_or_else(|| CoreError::NotFound("HEAD has no commits yet".into()).into()),
            Revision::Ref(branch_name) => {
                if let Some(oid) = repository.refs().read_branch(branch_name)? {
                    return Ok(oid);
                }

                // no such ref; fall back to object IDs for hex-looking names
                let name_str = branch_name.as_ref();
                if Self::looks_like_oid(name_str) {
                    Self::resolve_oid(name_str, repository)
                } else {
                    Err(CoreError::NotFound(format!("branch {name_str} not found")).into())
                }
            }
            Revision::Parent(base_revision, n) => {
                let oid = base_revision.resolve(repository)?;
                let commit = repository
                    .database()
                    .parse_object_as_commit(&oid)?
                    .ok_or_else(|| {
                        CoreError::InvalidArgument(format!("object {oid} is not a commit"))
                    })?;

                commit.parents().get(n - 1).cloned().ok_or_else(|| {
                    CoreError::NotFound(format!("commit {} has no parent {n}", oid.to_short_oid()))
                        .into()
                })
            }
            Revision::Ancestor(base_revision, generations) => {
                let mut oid = base_revision.resolve(repository)?;
                for _ in 0..*generations {
                    let commit = repository
                        .database()
                        .parse_object_as_commit(&oid)?
                        .ok_or_else(|| {
                            CoreError::InvalidArgument(format!("object {oid} is not a commit"))
                        })?;

                    oid = commit.parent().cloned().ok_or_else(|| {
                        CoreError::NotFound(format!(
                            "commit {} has no parent",
                            oid.to_short_oid()
                        ))
                    })?;
                }

                Ok(oid)
            }
        }
    }

    /// Resolve a tree-ish string to a tree digest
    ///
    /// Tries commit-ish resolution first (returning the commit's tree), then
    /// the literal `HEAD^{tree}`, then a bare digest of a tree object.
    pub fn resolve_treeish(treeish: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        if let Ok(revision) = Self::try_parse(treeish)
            && let Ok(commit_oid) = revision.resolve(repository)
        {
            let commit = repository
                .database()
                .parse_object_as_commit(&commit_oid)?
                .ok_or_else(|| {
                    CoreError::InvalidArgument(format!("object {commit_oid} is not a commit"))
                })?;
            return Ok(commit.tree_oid().clone());
        }

        if treeish == HEAD_TREE_LITERAL {
            let head_oid = repository
                .refs()
                .resolve_head()?
                .ok_or_else(|| CoreError::NotFound("HEAD has no commits yet".into()))?;
            let commit = repository
                .database()
                .parse_object_as_commit(&head_oid)?
                .ok_or_else(|| CoreError::Corrupt("HEAD does not point at a commit".into()))?;
            return Ok(commit.tree_oid().clone());
        }

        if let Ok(oid) = ObjectId::try_parse(treeish.to_string()) {
            return match repository.database().get_object_type(&oid)? {
                ObjectType::Tree => Ok(oid),
                other => Err(CoreError::InvalidArgument(format!(
                    "object {oid} is a {other}, not a tree"
                ))
                .into()),
            };
        }

        Err(CoreError::InvalidArgument(format!("not a tree-ish: {treeish}")).into())
    }

    fn resolve_oid(oid_str: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        // a full digest resolves directly
        if oid_str.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(oid_str.to_string())?;
            Self::validate_oid_is_commit(&oid, repository)?;
            return Ok(oid);
        }

        // otherwise it is an abbreviation; a unique prefix match wins
        let matches = repository.database().find_objects_by_prefix(oid_str)?;

        match matches.len() {
            0 => Err(CoreError::NotFound(format!(
                "unknown revision '{oid_str}': not a ref, not an object prefix"
            ))
            .into()),
            1 => {
                let oid = &matches[0];
                Self::validate_oid_is_commit(oid, repository)?;
                Ok(oid.clone())
            }
            _ => {
                let commit_matches: Vec<_> = matches
                    .iter()
                    .filter(|oid| {
                        repository
                            .database()
                            .get_object_type(oid)
                            .map(|t| t == ObjectType::Commit)
                            .unwrap_or(false)
                    })
                    .collect();

                match commit_matches.len() {
                    0 => Err(CoreError::NotFound(format!(
                        "unknown revision '{oid_str}': prefix matches no commit"
                    ))
                    .into()),
                    1 => Ok(commit_matches[0].clone()),
                    _ => {
                        let mut error_msg =
                            format!("short object id {oid_str} is ambiguous\nhint: the candidates are:");
                        for oid in &commit_matches {
                            error_msg.push_str(&format!("\nhint:   {} commit", oid.to_short_oid()));
                        }
                        Err(CoreError::InvalidArgument(error_msg).into())
                    }
                }
            }
        }
    }

    fn validate_oid_is_commit(oid: &ObjectId, repository: &Repository) -> anyhow::Result<()> {
        let obj_type = repository.database().get_object_type(oid)?;

        if obj_type != ObjectType::Commit {
            return Err(CoreError::InvalidArgument(format!(
                "object {} is a {}, not a commit",
                oid.to_short_oid(),
                obj_type
            ))
            .into());
        }

        Ok(())
    }

    fn looks_like_oid(s: &str) -> bool {
        // at least 4 characters of hex, at most a full digest
        s.len() >= 4 && s.len() <= OBJECT_ID_LENGTH && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}
