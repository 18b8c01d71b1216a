// Type coercion - turns a raw driver value plus its declared column type into a `RowValues`

use crate::cursor::RawValue;
use crate::error::SqlDbError;
use crate::types::RowValues;

/// How raw values from an engine are turned into canonical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionPolicy {
    /// Driver values are already natively typed; keep them as they are.
    Passthrough,
    /// Driver values are textual; re-parse them by declared type name.
    Reparse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Signed,
    Unsigned,
    Float,
    Flag,
    Text,
    Unknown,
}

fn target_for(type_name: &str) -> Target {
    match type_name.trim().to_ascii_uppercase().as_str() {
        "INT" | "BIGINT" | "SMALLINT" | "MEDIUMINT" => Target::Signed,
        "UNSIGNED BIGINT" | "UNSIGNED INT" | "UNSIGNED SMALLINT" | "UNSIGNED MEDIUMINT"
        | "UNSIGNED TINYINT" => Target::Unsigned,
        "FLOAT" | "DOUBLE" | "REAL" => Target::Float,
        "TINYINT" | "BIT" => Target::Flag,
        "VARCHAR" | "TEXT" | "TIMESTAMP" | "VARBINARY" | "CHAR" | "NCHAR" | "NVARCHAR"
        | "NTEXT" | "DATETIME" | "DATETIME2" | "DATETIMEOFFSET" | "DATE" | "TIME" | "YEAR"
        | "DECIMAL" | "NUMERIC" | "MONEY" | "UNIQUEIDENTIFIER" | "XML" | "BINARY" | "BLOB"
        | "ENUM" | "SET" => Target::Text,
        _ => Target::Unknown,
    }
}

fn decode_error(column: &str, type_name: &str, message: impl ToString) -> SqlDbError {
    SqlDbError::DecodeError {
        column: column.to_string(),
        type_name: type_name.to_string(),
        message: message.to_string(),
    }
}

/// Coerce one raw column value.
///
/// A raw NULL is always `RowValues::Null`, whatever the declared type. Unrecognised
/// type names never fail: the value is kept as text and a warning is logged.
///
/// # Errors
/// Returns `SqlDbError::DecodeError` when a numeric or flag column holds text that
/// does not parse as its declared type.
pub fn coerce(
    policy: CoercionPolicy,
    column: &str,
    type_name: &str,
    raw: &RawValue,
) -> Result<RowValues, SqlDbError> {
    if raw.is_null() {
        return Ok(RowValues::Null);
    }

    if policy == CoercionPolicy::Passthrough {
        return Ok(match raw {
            RawValue::Native(value) => value.clone(),
            other => RowValues::Text(other.render()),
        });
    }

    let text = raw.render();
    match target_for(type_name) {
        Target::Signed => text
            .trim()
            .parse::<i64>()
            .map(RowValues::Int)
            .map_err(|e| decode_error(column, type_name, e)),
        Target::Unsigned => text
            .trim()
            .parse::<u64>()
            .map(RowValues::UInt)
            .map_err(|e| decode_error(column, type_name, e)),
        Target::Float => text
            .trim()
            .parse::<f64>()
            .map(RowValues::Float)
            .map_err(|e| decode_error(column, type_name, e)),
        Target::Flag => {
            let flag = match raw {
                RawValue::Native(RowValues::Bool(b)) => *b,
                _ => {
                    text.trim()
                        .parse::<i64>()
                        .map_err(|e| decode_error(column, type_name, e))?
                        == 1
                }
            };
            Ok(RowValues::Bool(flag))
        }
        Target::Text => Ok(RowValues::Text(text)),
        Target::Unknown => {
            if raw.is_empty() {
                return Ok(RowValues::Null);
            }
            tracing::warn!(column, type_name, "unknown column type, keeping textual value");
            Ok(RowValues::Text(text))
        }
    }
}
