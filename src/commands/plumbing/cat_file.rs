use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::revision::Revision;
use crate::errors::CoreError;
use std::io::{Cursor, Write};

/// What `cat-file` should print about the object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    /// `-p`: pretty-print the content
    Pretty,
    /// `-t`: print the object type
    Type,
    /// `-s`: print the payload size
    Size,
}

impl Repository {
    /// Print the content, type or size of an object
    ///
    /// The argument may be a commit-ish, a tree-ish or a raw digest; the
    /// resolutions are tried in that order.
    pub fn cat_file(&mut self, object: &str, mode: CatFileMode) -> anyhow::Result<()> {
        let oid = self.resolve_object_name(object)?;

        match mode {
            CatFileMode::Type => {
                let object_type = self.database().get_object_type(&oid)?;
                writeln!(self.writer(), "{object_type}")?;
            }
            CatFileMode::Size => {
                let content = self.database().load(&oid)?;
                let mut reader = Cursor::new(content);
                let (_, size) = ObjectType::parse_header(&mut reader)?;
                writeln!(self.writer(), "{size}")?;
            }
            CatFileMode::Pretty => match self.database().parse_object(&oid)? {
                ObjectBox::Blob(blob) => {
                    self.writer().write_all(blob.content())?;
                }
                ObjectBox::Tree(tree) => {
                    writeln!(self.writer(), "{}", tree.display())?;
                }
                ObjectBox::Commit(commit) => {
                    writeln!(self.writer(), "{}", commit.display())?;
                }
            },
        }

        Ok(())
    }

    fn resolve_object_name(&self, object: &str) -> anyhow::Result<ObjectId> {
        if let Ok(revision) = Revision::try_parse(object)
            && let Ok(oid) = revision.resolve(self)
        {
            return Ok(oid);
        }

        if let Ok(oid) = Revision::resolve_treeish(object, self) {
            return Ok(oid);
        }

        // fall back to a raw digest (covers blobs)
        ObjectId::try_parse(object.to_string())
            .map_err(|_| CoreError::InvalidArgument(format!("not a valid object name: {object}")).into())
    }
}
