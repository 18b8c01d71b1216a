use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::SqlDbError;

use super::TableSchema;

/// Load a JSON array of table descriptors.
///
/// # Errors
/// Returns `SqlDbError::Io` if the file cannot be read and `SqlDbError::Serialization`
/// if it is not a descriptor array.
pub fn read_schema_file(path: impl AsRef<Path>) -> Result<Vec<TableSchema>, SqlDbError> {
    let bytes = fs::read(path.as_ref())?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Write table descriptors as an indented JSON array.
///
/// # Errors
/// Returns `SqlDbError::Serialization` or `SqlDbError::Io` on failure.
pub fn write_schema_file(path: impl AsRef<Path>, schemas: &[TableSchema]) -> Result<(), SqlDbError> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b" "));
    schemas.serialize(&mut serializer)?;
    out.push(b'\n');
    fs::write(path.as_ref(), out)?;
    Ok(())
}
