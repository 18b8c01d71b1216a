use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::{Column, Row, Value};

use crate::cursor::{RawValue, RowCursor};

// Collation id MySQL reports for binary strings and blobs.
const BINARY_CHARSET: u16 = 63;

/// Name a `MySQL` column type the way the coercion table spells it.
#[must_use]
pub fn mysql_type_name(column: &Column) -> &'static str {
    let unsigned = column.flags().contains(ColumnFlags::UNSIGNED_FLAG);
    let binary = column.character_set() == BINARY_CHARSET;
    match column.column_type() {
        ColumnType::MYSQL_TYPE_TINY if unsigned => "UNSIGNED TINYINT",
        ColumnType::MYSQL_TYPE_TINY => "TINYINT",
        ColumnType::MYSQL_TYPE_SHORT if unsigned => "UNSIGNED SMALLINT",
        ColumnType::MYSQL_TYPE_SHORT => "SMALLINT",
        ColumnType::MYSQL_TYPE_INT24 if unsigned => "UNSIGNED MEDIUMINT",
        ColumnType::MYSQL_TYPE_INT24 => "MEDIUMINT",
        ColumnType::MYSQL_TYPE_LONG if unsigned => "UNSIGNED INT",
        ColumnType::MYSQL_TYPE_LONG => "INT",
        ColumnType::MYSQL_TYPE_LONGLONG if unsigned => "UNSIGNED BIGINT",
        ColumnType::MYSQL_TYPE_LONGLONG => "BIGINT",
        ColumnType::MYSQL_TYPE_FLOAT => "FLOAT",
        ColumnType::MYSQL_TYPE_DOUBLE => "DOUBLE",
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => "DECIMAL",
        ColumnType::MYSQL_TYPE_BIT => "BIT",
        ColumnType::MYSQL_TYPE_YEAR => "YEAR",
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => "DATE",
        ColumnType::MYSQL_TYPE_TIME | ColumnType::MYSQL_TYPE_TIME2 => "TIME",
        ColumnType::MYSQL_TYPE_DATETIME | ColumnType::MYSQL_TYPE_DATETIME2 => "DATETIME",
        ColumnType::MYSQL_TYPE_TIMESTAMP | ColumnType::MYSQL_TYPE_TIMESTAMP2 => "TIMESTAMP",
        ColumnType::MYSQL_TYPE_VARCHAR | ColumnType::MYSQL_TYPE_VAR_STRING if binary => {
            "VARBINARY"
        }
        ColumnType::MYSQL_TYPE_VARCHAR | ColumnType::MYSQL_TYPE_VAR_STRING => "VARCHAR",
        ColumnType::MYSQL_TYPE_STRING if binary => "BINARY",
        ColumnType::MYSQL_TYPE_STRING => "CHAR",
        ColumnType::MYSQL_TYPE_TINY_BLOB
        | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
        | ColumnType::MYSQL_TYPE_LONG_BLOB
        | ColumnType::MYSQL_TYPE_BLOB
            if binary =>
        {
            "BLOB"
        }
        ColumnType::MYSQL_TYPE_TINY_BLOB
        | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
        | ColumnType::MYSQL_TYPE_LONG_BLOB
        | ColumnType::MYSQL_TYPE_BLOB => "TEXT",
        ColumnType::MYSQL_TYPE_ENUM => "ENUM",
        ColumnType::MYSQL_TYPE_SET => "SET",
        ColumnType::MYSQL_TYPE_JSON => "JSON",
        ColumnType::MYSQL_TYPE_GEOMETRY => "GEOMETRY",
        ColumnType::MYSQL_TYPE_NULL => "NULL",
        _ => "UNKNOWN",
    }
}

/// BIT(n) arrives as big-endian bytes; render it as its decimal value.
fn bit_value(bytes: &[u8]) -> RawValue {
    let value = bytes
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    RawValue::Bytes(value.to_string().into_bytes())
}

fn render_date(y: u16, mo: u8, d: u8, h: u8, mi: u8, s: u8, us: u32) -> String {
    let mut out = format!("{y:04}-{mo:02}-{d:02}");
    if h != 0 || mi != 0 || s != 0 || us != 0 {
        out.push_str(&format!(" {h:02}:{mi:02}:{s:02}"));
        if us != 0 {
            out.push_str(&format!(".{us:06}"));
        }
    }
    out
}

/// Convert one `MySQL` value into a raw cursor value. The text protocol hands
/// back bytes for everything but NULL; the other arms cover binary results.
#[must_use]
pub fn mysql_extract_value(value: &Value, column_type: &str) -> RawValue {
    let text = match value {
        Value::NULL => return RawValue::Null,
        Value::Bytes(bytes) if column_type == "BIT" => return bit_value(bytes),
        Value::Bytes(bytes) => return RawValue::Bytes(bytes.clone()),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Double(f) => f.to_string(),
        Value::Date(y, mo, d, h, mi, s, us) => render_date(*y, *mo, *d, *h, *mi, *s, *us),
        Value::Time(neg, days, h, mi, s, us) => {
            let hours = days * 24 + u32::from(*h);
            let sign = if *neg { "-" } else { "" };
            if *us == 0 {
                format!("{sign}{hours:02}:{mi:02}:{s:02}")
            } else {
                format!("{sign}{hours:02}:{mi:02}:{s:02}.{us:06}")
            }
        }
    };
    RawValue::Bytes(text.into_bytes())
}

/// Build a buffered cursor from column metadata and collected rows.
#[must_use]
pub fn build_cursor(columns: &[Column], rows: &[Row]) -> RowCursor {
    let columns: Vec<(String, String)> = columns
        .iter()
        .map(|c| (c.name_str().into_owned(), mysql_type_name(c).to_string()))
        .collect();

    let values = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, (_, type_name))| {
                    row.as_ref(idx)
                        .map_or(RawValue::Null, |v| mysql_extract_value(v, type_name))
                })
                .collect()
        })
        .collect();
    RowCursor::new(columns, values)
}
