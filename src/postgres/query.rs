use std::error::Error;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tokio_postgres::types::{FromSql, Type};
use tokio_postgres::{Row, Statement};
use uuid::Uuid;

use crate::cursor::{RawValue, RowCursor};
use crate::error::SqlDbError;
use crate::types::RowValues;

type BoxError = Box<dyn Error + Sync + Send>;

/// Build a buffered cursor from a prepared statement and its rows.
///
/// # Errors
/// Returns errors from value extraction.
pub fn build_cursor(stmt: &Statement, rows: &[Row]) -> Result<RowCursor, SqlDbError> {
    let columns: Vec<(String, String)> = stmt
        .columns()
        .iter()
        .map(|col| (col.name().to_string(), col.type_().name().to_string()))
        .collect();

    let mut values = Vec::with_capacity(rows.len());
    for row in rows {
        let mut row_values = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        values.push(row_values);
    }
    Ok(RowCursor::new(columns, values))
}

fn native<T>(value: Option<T>, wrap: impl FnOnce(T) -> RowValues) -> RawValue {
    value.map_or(RawValue::Null, |v| RawValue::Native(wrap(v)))
}

/// Extracts a natively typed value from a `tokio_postgres` Row at the given index.
///
/// Temporal, JSON, numeric and uuid values are rendered to text; anything unrecognised
/// is read as lossy UTF-8 text.
///
/// # Errors
/// Returns `SqlDbError` if the column cannot be retrieved.
pub fn postgres_extract_value(row: &Row, idx: usize) -> Result<RawValue, SqlDbError> {
    let type_info = row.columns()[idx].type_();

    let value = match type_info.name() {
        "int2" => native(row.try_get::<_, Option<i16>>(idx)?, |v| {
            RowValues::Int(i64::from(v))
        }),
        "int4" => native(row.try_get::<_, Option<i32>>(idx)?, |v| {
            RowValues::Int(i64::from(v))
        }),
        "int8" => native(row.try_get::<_, Option<i64>>(idx)?, RowValues::Int),
        "oid" => native(row.try_get::<_, Option<u32>>(idx)?, |v| {
            RowValues::UInt(u64::from(v))
        }),
        "float4" => native(row.try_get::<_, Option<f32>>(idx)?, |v| {
            RowValues::Float(f64::from(v))
        }),
        "float8" => native(row.try_get::<_, Option<f64>>(idx)?, RowValues::Float),
        "bool" => native(row.try_get::<_, Option<bool>>(idx)?, RowValues::Bool),
        "text" | "varchar" | "bpchar" | "name" | "unknown" => {
            native(row.try_get::<_, Option<String>>(idx)?, RowValues::Text)
        }
        "timestamp" => native(row.try_get::<_, Option<NaiveDateTime>>(idx)?, |v| {
            RowValues::Text(v.to_string())
        }),
        "timestamptz" => native(row.try_get::<_, Option<DateTime<Utc>>>(idx)?, |v| {
            RowValues::Text(v.to_rfc3339())
        }),
        "date" => native(row.try_get::<_, Option<NaiveDate>>(idx)?, |v| {
            RowValues::Text(v.to_string())
        }),
        "time" => native(row.try_get::<_, Option<NaiveTime>>(idx)?, |v| {
            RowValues::Text(v.to_string())
        }),
        "json" | "jsonb" => native(row.try_get::<_, Option<Value>>(idx)?, |v| {
            RowValues::Text(v.to_string())
        }),
        "numeric" => native(row.try_get::<_, Option<PgNumeric>>(idx)?, |v| {
            RowValues::Text(v.0)
        }),
        "uuid" => native(row.try_get::<_, Option<Uuid>>(idx)?, |v| {
            RowValues::Text(v.to_string())
        }),
        other => {
            tracing::warn!(type_name = other, "reading postgres column as text");
            native(row.try_get::<_, Option<PgText>>(idx)?, |v| {
                RowValues::Text(v.0)
            })
        }
    };
    Ok(value)
}

/// Lossy UTF-8 view of a column of any other type.
struct PgText(String);

impl<'a> FromSql<'a> for PgText {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        Ok(PgText(String::from_utf8_lossy(raw).into_owned()))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

// Sign word values of the numeric wire header that `Decimal` cannot represent.
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

/// `numeric` rendered through `rust_decimal`, with the special values spelled the way
/// `PostgreSQL` prints them.
struct PgNumeric(String);

impl<'a> FromSql<'a> for PgNumeric {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let special = match raw.get(4..6) {
            Some(&[hi, lo]) => match u16::from_be_bytes([hi, lo]) {
                NUMERIC_NAN => Some("NaN"),
                NUMERIC_PINF => Some("Infinity"),
                NUMERIC_NINF => Some("-Infinity"),
                _ => None,
            },
            _ => None,
        };
        if let Some(text) = special {
            return Ok(PgNumeric(text.to_string()));
        }
        Ok(PgNumeric(Decimal::from_sql(ty, raw)?.to_string()))
    }

    fn accepts(ty: &Type) -> bool {
        <Decimal as FromSql>::accepts(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(ndigits: u16, weight: i16, sign: u16, dscale: u16, digits: &[u16]) -> Vec<u8> {
        [ndigits, u16::from_be_bytes(weight.to_be_bytes()), sign, dscale]
            .iter()
            .chain(digits)
            .flat_map(|w| w.to_be_bytes())
            .collect()
    }

    fn render(raw: &[u8]) -> String {
        PgNumeric::from_sql(&Type::NUMERIC, raw).unwrap().0
    }

    #[test]
    fn numeric_keeps_scale() {
        // 12345.678 = [1, 2345, 6780], weight 1, scale 3
        assert_eq!(render(&numeric(3, 1, 0, 3, &[1, 2345, 6780])), "12345.678");
        // -0.0005 = [5], weight -1, scale 4
        assert_eq!(render(&numeric(1, -1, 0x4000, 4, &[5])), "-0.0005");
    }

    #[test]
    fn numeric_special_values() {
        assert_eq!(render(&numeric(0, 0, NUMERIC_NAN, 0, &[])), "NaN");
        assert_eq!(render(&numeric(0, 0, NUMERIC_PINF, 0, &[])), "Infinity");
        assert_eq!(render(&numeric(0, 0, NUMERIC_NINF, 0, &[])), "-Infinity");
    }

    #[test]
    fn numeric_rejects_garbage() {
        assert!(PgNumeric::from_sql(&Type::NUMERIC, &[0, 1]).is_err());
    }
}
