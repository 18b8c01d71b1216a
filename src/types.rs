use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::SqlDbError;

/// Canonical scalar held in a decoded row or fed to the SQL builders.
///
/// Every engine's native values collapse into this closed set:
/// ```rust
/// use sqldb_middleware::prelude::*;
///
/// let values = vec![
///     RowValues::Int(1),
///     RowValues::Text("widget".into()),
///     RowValues::Bool(true),
/// ];
/// assert_eq!(values[1].to_string(), "widget");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowValues {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed integer value (64-bit)
    Int(i64),
    /// Unsigned integer value (64-bit)
    UInt(u64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Signed view of the value; unsigned values that fit are widened.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RowValues::Int(value) => Some(*value),
            RowValues::UInt(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            RowValues::UInt(value) => Some(*value),
            RowValues::Int(value) => u64::try_from(*value).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let RowValues::Bool(value) = self {
            return Some(*value);
        } else if let Some(i) = self.as_int() {
            if i == 1 {
                return Some(true);
            } else if i == 0 {
                return Some(false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }
}

/// Default textual rendering. NULL renders as the empty string.
impl fmt::Display for RowValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowValues::Null => Ok(()),
            RowValues::Bool(b) => write!(f, "{b}"),
            RowValues::Int(i) => write!(f, "{i}"),
            RowValues::UInt(u) => write!(f, "{u}"),
            RowValues::Float(x) => write!(f, "{x}"),
            RowValues::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<u64> for RowValues {
    fn from(value: u64) -> Self {
        RowValues::UInt(value)
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// The database engines supported by this middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `PostgreSQL` database
    Postgres,
    /// `MySQL` (and MariaDB) database
    Mysql,
    /// SQL Server database
    Sqlserver,
}

impl DatabaseType {
    /// The driver name this engine is selected by.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DatabaseType::Postgres => "postgres",
            DatabaseType::Mysql => "mysql",
            DatabaseType::Sqlserver => "sqlserver",
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseType {
    type Err = SqlDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, false)
            .map_err(|_| SqlDbError::NoDriver(s.to_string()))
    }
}
