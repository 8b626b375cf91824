use crate::areas::database::Database;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// Compute the object ID of a file's contents, optionally writing the
    /// object to the database
    ///
    /// The file may live outside the working tree; its bytes are framed as
    /// the given type (blob by default).
    pub fn hash_object(
        &mut self,
        file: &str,
        object_type: &str,
        write: bool,
    ) -> anyhow::Result<()> {
        let object_type = ObjectType::try_from(object_type)?;
        let data =
            std::fs::read(file).with_context(|| format!("failed to read file {file:?}"))?;

        let oid = if write {
            self.database().store_raw(object_type, &data)?
        } else {
            Database::hash_raw(object_type, &data)?
        };

        writeln!(self.writer(), "{oid}")?;

        Ok(())
    }
}
