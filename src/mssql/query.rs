use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use futures_util::TryStreamExt;
use tiberius::{ColumnData, ColumnType, FromSql, QueryStream};

use crate::cursor::{RawValue, RowCursor};
use crate::error::SqlDbError;
use crate::types::RowValues;

/// Name a tiberius column type the way the coercion table spells it.
#[must_use]
pub fn mssql_type_name(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Int1 => "TINYINT",
        ColumnType::Int2 => "SMALLINT",
        ColumnType::Int4 => "INT",
        ColumnType::Int8 | ColumnType::Intn => "BIGINT",
        ColumnType::Bit | ColumnType::Bitn => "BIT",
        ColumnType::Float4 => "REAL",
        ColumnType::Float8 | ColumnType::Floatn => "FLOAT",
        ColumnType::Money | ColumnType::Money4 => "MONEY",
        ColumnType::Decimaln => "DECIMAL",
        ColumnType::Numericn => "NUMERIC",
        ColumnType::Guid => "UNIQUEIDENTIFIER",
        ColumnType::Datetime | ColumnType::Datetime4 | ColumnType::Datetimen => "DATETIME",
        ColumnType::Datetime2 => "DATETIME2",
        ColumnType::DatetimeOffsetn => "DATETIMEOFFSET",
        ColumnType::Daten => "DATE",
        ColumnType::Timen => "TIME",
        ColumnType::BigVarChar => "VARCHAR",
        ColumnType::BigChar => "CHAR",
        ColumnType::NVarchar => "NVARCHAR",
        ColumnType::NChar => "NCHAR",
        ColumnType::Text => "TEXT",
        ColumnType::NText => "NTEXT",
        ColumnType::Xml => "XML",
        ColumnType::BigVarBin | ColumnType::BigBinary | ColumnType::Image => "VARBINARY",
        ColumnType::Null => "NULL",
        _ => "SQL_VARIANT",
    }
}

fn temporal<'a, T>(data: &'a ColumnData<'static>) -> Result<RawValue, SqlDbError>
where
    T: FromSql<'a> + ToString,
{
    Ok(T::from_sql(data)?.map_or(RawValue::Null, |v| {
        RawValue::Native(RowValues::Text(v.to_string()))
    }))
}

fn native<T>(value: Option<T>, wrap: impl FnOnce(T) -> RowValues) -> RawValue {
    value.map_or(RawValue::Null, |v| RawValue::Native(wrap(v)))
}

/// Convert one tiberius column value into a raw cursor value.
///
/// # Errors
/// Returns the driver error when a temporal value cannot be converted.
pub fn mssql_extract_value(data: ColumnData<'static>) -> Result<RawValue, SqlDbError> {
    let value = match data {
        ColumnData::U8(v) => native(v, |v| RowValues::Int(i64::from(v))),
        ColumnData::I16(v) => native(v, |v| RowValues::Int(i64::from(v))),
        ColumnData::I32(v) => native(v, |v| RowValues::Int(i64::from(v))),
        ColumnData::I64(v) => native(v, RowValues::Int),
        ColumnData::F32(v) => native(v, |v| RowValues::Float(f64::from(v))),
        ColumnData::F64(v) => native(v, RowValues::Float),
        ColumnData::Bit(v) => native(v, RowValues::Bool),
        ColumnData::String(v) => native(v, |s| RowValues::Text(s.into_owned())),
        ColumnData::Guid(v) => native(v, |g| RowValues::Text(g.to_string())),
        ColumnData::Numeric(v) => native(v, |n| RowValues::Text(n.to_string())),
        ColumnData::Xml(v) => native(v, |x| RowValues::Text(x.into_owned().into_string())),
        ColumnData::Binary(v) => v.map_or(RawValue::Null, |b| RawValue::Bytes(b.into_owned())),
        ColumnData::Date(_) => temporal::<NaiveDate>(&data)?,
        ColumnData::Time(_) => temporal::<NaiveTime>(&data)?,
        ColumnData::DateTimeOffset(_) => temporal::<DateTime<FixedOffset>>(&data)?,
        ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
            temporal::<NaiveDateTime>(&data)?
        }
    };
    Ok(value)
}

/// Drain the first result set of a query stream into a buffered cursor.
///
/// # Errors
/// Returns driver errors raised while reading columns or rows.
pub async fn build_cursor(mut stream: QueryStream<'_>) -> Result<RowCursor, SqlDbError> {
    let columns: Vec<(String, String)> = stream
        .columns()
        .await?
        .map(|cols| {
            cols.iter()
                .map(|c| {
                    (
                        c.name().to_string(),
                        mssql_type_name(c.column_type()).to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    let mut rows = Vec::new();
    let mut row_stream = stream.into_row_stream();
    while let Some(row) = row_stream.try_next().await? {
        let values = row
            .into_iter()
            .map(mssql_extract_value)
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(values);
    }
    Ok(RowCursor::new(columns, rows))
}
