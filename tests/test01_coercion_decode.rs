use std::sync::Arc;

use sqldb_middleware::prelude::*;
use sqldb_middleware::test_utils::RecordingAdapter;
use tokio::runtime::Runtime;

fn bytes(s: &str) -> RawValue {
    RawValue::from(s)
}

#[test]
fn test01_mysql_rows_are_reparsed_by_type() -> Result<(), Box<dyn std::error::Error>> {
    let adapter = RecordingAdapter::new();
    adapter.respond(
        "FROM gadgets",
        &[
            ("id", "INT"),
            ("name", "VARCHAR"),
            ("active", "TINYINT"),
            ("price", "DOUBLE"),
            ("big", "UNSIGNED BIGINT"),
            ("made", "DATETIME"),
            ("note", "TEXT"),
        ],
        vec![
            vec![
                bytes("1"),
                bytes("widget"),
                bytes("1"),
                bytes("2.5"),
                bytes("18446744073709551615"),
                bytes("2024-05-01 10:00:00"),
                RawValue::Null,
            ],
            vec![
                bytes("2"),
                bytes(""),
                bytes("0"),
                bytes("0"),
                bytes("0"),
                RawValue::Null,
                bytes("hi"),
            ],
        ],
    );
    let db = Db::new(DatabaseType::Mysql, Arc::new(adapter.clone()));

    let rt = Runtime::new()?;
    let rows = rt.block_on(db.query_associative_array("SELECT * FROM gadgets"))?;

    assert_eq!(rows.len(), 2);
    let first = &rows[0];
    assert_eq!(first.get("id"), Some(&RowValues::Int(1)));
    assert_eq!(first.get("name"), Some(&RowValues::Text("widget".into())));
    assert_eq!(first.get("active"), Some(&RowValues::Bool(true)));
    assert_eq!(first.get("price"), Some(&RowValues::Float(2.5)));
    assert_eq!(first.get("big"), Some(&RowValues::UInt(u64::MAX)));
    assert_eq!(
        first.get("made"),
        Some(&RowValues::Text("2024-05-01 10:00:00".into()))
    );
    assert_eq!(first.get("note"), Some(&RowValues::Null));

    let second = &rows[1];
    assert_eq!(second.get("name"), Some(&RowValues::Text(String::new())));
    assert_eq!(second.get("active"), Some(&RowValues::Bool(false)));
    assert_eq!(second.get("made"), Some(&RowValues::Null));

    assert_eq!(adapter.cursors_opened(), 1);
    assert_eq!(adapter.cursors_closed(), 1);
    Ok(())
}

#[test]
fn test01_decode_failure_discards_rows_and_closes() -> Result<(), Box<dyn std::error::Error>> {
    let adapter = RecordingAdapter::new();
    adapter.respond(
        "FROM gadgets",
        &[("id", "INT")],
        vec![vec![bytes("1")], vec![bytes("abc")], vec![bytes("3")]],
    );
    let db = Db::new(DatabaseType::Mysql, Arc::new(adapter.clone()));

    let rt = Runtime::new()?;
    let err = rt
        .block_on(db.query_associative_array("SELECT id FROM gadgets"))
        .unwrap_err();
    assert!(matches!(err, SqlDbError::DecodeError { ref column, .. } if column == "id"));
    assert_eq!(adapter.cursors_closed(), adapter.cursors_opened());
    Ok(())
}

#[test]
fn test01_unknown_types_keep_text() -> Result<(), Box<dyn std::error::Error>> {
    let adapter = RecordingAdapter::new();
    adapter.respond(
        "FROM shapes",
        &[("shape", "GEOMETRY"), ("blank", "GEOMETRY")],
        vec![vec![bytes("POINT(1 2)"), bytes("")]],
    );
    let db = Db::new(DatabaseType::Sqlserver, Arc::new(adapter));

    let rt = Runtime::new()?;
    let rows = rt.block_on(db.query_associative_array("SELECT * FROM shapes"))?;
    assert_eq!(rows[0].get_string("shape"), "POINT(1 2)");
    assert_eq!(rows[0].get("blank"), Some(&RowValues::Null));
    Ok(())
}

#[test]
fn test01_postgres_values_pass_through() -> Result<(), Box<dyn std::error::Error>> {
    let adapter = RecordingAdapter::new();
    adapter.respond(
        "FROM items",
        &[("id", "int4"), ("name", "varchar"), ("price", "numeric")],
        vec![vec![
            RawValue::Native(RowValues::Int(7)),
            RawValue::Native(RowValues::Text("bolt".into())),
            RawValue::Native(RowValues::Text("12.50".into())),
        ]],
    );
    let db = Db::new(DatabaseType::Postgres, Arc::new(adapter));

    let rt = Runtime::new()?;
    let rows = rt.block_on(db.query_associative_array("SELECT * FROM items"))?;
    assert_eq!(rows[0].get("id"), Some(&RowValues::Int(7)));
    assert_eq!(rows[0].get("price"), Some(&RowValues::Text("12.50".into())));
    assert_eq!(rows[0].get_float("price"), Some(12.5));
    Ok(())
}

#[test]
fn test01_driver_errors_and_unknown_engines() -> Result<(), Box<dyn std::error::Error>> {
    let adapter = RecordingAdapter::new();
    adapter.fail("FROM missing", "relation does not exist");
    let db = Db::new(DatabaseType::Postgres, Arc::new(adapter.clone()));

    let rt = Runtime::new()?;
    let err = rt
        .block_on(db.query_associative_array("SELECT * FROM missing"))
        .unwrap_err();
    assert!(matches!(err, SqlDbError::ExecutionError(_)));

    let err = Db::from_driver_name("sqlite", Arc::new(adapter)).unwrap_err();
    assert!(matches!(err, SqlDbError::NoDriver(name) if name == "sqlite"));
    Ok(())
}
