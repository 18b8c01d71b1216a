//! Table descriptors: column types with optional documentation comments.
//!
//! A column type is persisted as a single descriptor string, `"<native type>|<comment>"`,
//! and handled in memory as a structured [`ColumnType`]. Columns keep the order they
//! were declared or introspected in.

pub mod ddl;
pub mod file;
pub mod introspect;
pub mod links;

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use ddl::TableDdl;
pub use links::{Link, build_links};

/// Native engine type plus an optional free-text comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    pub native: String,
    comment: Option<String>,
}

impl ColumnType {
    /// Blank comments are dropped.
    #[must_use]
    pub fn new(native: impl Into<String>, comment: Option<&str>) -> Self {
        Self {
            native: native.into().trim().to_string(),
            comment: comment
                .filter(|c| !c.trim().is_empty())
                .map(ToString::to_string),
        }
    }

    /// Parse a `"native|comment"` descriptor, splitting at the first pipe.
    #[must_use]
    pub fn parse(descriptor: &str) -> Self {
        match descriptor.split_once('|') {
            Some((native, comment)) => Self::new(native, Some(comment)),
            None => Self::new(descriptor, None),
        }
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// The persisted descriptor form.
    #[must_use]
    pub fn descriptor(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.comment {
            Some(comment) => write!(f, "{}|{comment}", self.native),
            None => f.write_str(&self.native),
        }
    }
}

impl From<&str> for ColumnType {
    fn from(descriptor: &str) -> Self {
        Self::parse(descriptor)
    }
}

impl Serialize for ColumnType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let descriptor = String::deserialize(deserializer)?;
        Ok(Self::parse(&descriptor))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDef {
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: impl Into<ColumnType>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
        }
    }
}

/// One table: its name and ordered column definitions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    #[serde(
        default,
        serialize_with = "serialize_columns",
        deserialize_with = "deserialize_columns"
    )]
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column from its descriptor string. A repeated name replaces the earlier type.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>, descriptor: &str) -> Self {
        self.push(ColumnDef::new(name, descriptor));
        self
    }

    pub fn push(&mut self, column: ColumnDef) {
        if let Some(existing) = self.columns.iter_mut().find(|c| c.name == column.name) {
            existing.column_type = column.column_type;
        } else {
            self.columns.push(column);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColumnType> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.column_type)
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[allow(clippy::ptr_arg)]
fn serialize_columns<S: Serializer>(
    columns: &Vec<ColumnDef>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(columns.len()))?;
    for column in columns {
        map.serialize_entry(&column.name, &column.column_type)?;
    }
    map.end()
}

struct ColumnsVisitor;

impl<'de> Visitor<'de> for ColumnsVisitor {
    type Value = Vec<ColumnDef>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of column name to type descriptor")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut columns: Vec<ColumnDef> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, column_type)) = access.next_entry::<String, ColumnType>()? {
            if let Some(existing) = columns.iter_mut().find(|c| c.name == name) {
                existing.column_type = column_type;
            } else {
                columns.push(ColumnDef { name, column_type });
            }
        }
        Ok(columns)
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }
}

fn deserialize_columns<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<ColumnDef>, D::Error> {
    deserializer.deserialize_any(ColumnsVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_splits_at_first_pipe() {
        let ct = ColumnType::parse("varchar(50)|Name of the item");
        assert_eq!(ct.native, "varchar(50)");
        assert_eq!(ct.comment(), Some("Name of the item"));
        assert_eq!(ct.descriptor(), "varchar(50)|Name of the item");

        let ct = ColumnType::parse("integer");
        assert_eq!(ct.comment(), None);
        assert_eq!(ct.descriptor(), "integer");

        let ct = ColumnType::parse("integer|   ");
        assert_eq!(ct.comment(), None);
        assert_eq!(ct.descriptor(), "integer");

        let ct = ColumnType::parse("text|a|b");
        assert_eq!(ct.comment(), Some("a|b"));
    }

    #[test]
    fn json_keeps_column_order() {
        let json = r#"{"name":"items","columns":{"id":"integer","name":"varchar(50)|label","qty":"integer"}}"#;
        let schema: TableSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.column_names(), vec!["id", "name", "qty"]);
        assert_eq!(schema.get("name").unwrap().comment(), Some("label"));
        assert_eq!(serde_json::to_string(&schema).unwrap(), json);
    }

    #[test]
    fn null_columns_read_as_empty() {
        let schema: TableSchema =
            serde_json::from_str(r#"{"name":"empty","columns":null}"#).unwrap();
        assert!(schema.is_empty());
    }

    #[test]
    fn push_replaces_repeated_column() {
        let schema = TableSchema::new("t")
            .column("a", "integer")
            .column("b", "text")
            .column("a", "bigint");
        assert_eq!(schema.column_names(), vec!["a", "b"]);
        assert_eq!(schema.get("a").unwrap().native, "bigint");
    }
}
