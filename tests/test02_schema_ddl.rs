use std::sync::Arc;

use sqldb_middleware::prelude::*;
use sqldb_middleware::test_utils::RecordingAdapter;
use tokio::runtime::Runtime;

fn items() -> TableSchema {
    TableSchema::new("items")
        .column("id", "integer")
        .column("name", "varchar(50)|Item name")
        .column("qty", "integer")
}

fn text(s: &str) -> RawValue {
    RawValue::Native(RowValues::Text(s.into()))
}

#[test]
fn test02_postgres_create_table_then_comments() -> Result<(), Box<dyn std::error::Error>> {
    let adapter = RecordingAdapter::new();
    let db = Db::new(DatabaseType::Postgres, Arc::new(adapter.clone()));

    let rt = Runtime::new()?;
    rt.block_on(db.create_table(&items()))?;

    assert_eq!(
        adapter.statements(),
        vec![
            "CREATE TABLE items ( id SERIAL PRIMARY KEY, name varchar(50), qty integer )"
                .to_string(),
            "COMMENT ON COLUMN items.name IS 'Item name'".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn test02_failed_comment_is_partial_ddl() -> Result<(), Box<dyn std::error::Error>> {
    let adapter = RecordingAdapter::new();
    adapter.fail("COMMENT ON COLUMN", "permission denied");
    let db = Db::new(DatabaseType::Postgres, Arc::new(adapter.clone()));

    let rt = Runtime::new()?;
    let err = rt.block_on(db.create_table(&items())).unwrap_err();
    match err {
        SqlDbError::PartialDdl { table, column, .. } => {
            assert_eq!(table, "items");
            assert_eq!(column, "name");
        }
        other => panic!("expected partial ddl, got {other:?}"),
    }
    // The table itself was created first.
    assert!(adapter.statements()[0].starts_with("CREATE TABLE items"));
    Ok(())
}

#[test]
fn test02_invalid_names_never_reach_the_driver() -> Result<(), Box<dyn std::error::Error>> {
    let adapter = RecordingAdapter::new();
    let db = Db::new(DatabaseType::Mysql, Arc::new(adapter.clone()));

    let rt = Runtime::new()?;
    let bad = TableSchema::new("items; DROP TABLE users").column("id", "integer");
    assert!(matches!(
        rt.block_on(db.create_table(&bad)),
        Err(SqlDbError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        rt.block_on(db.fetch_schema("items where 1=1")),
        Err(SqlDbError::InvalidIdentifier(_))
    ));
    assert!(adapter.statements().is_empty());
    Ok(())
}

#[test]
fn test02_fetch_schema_keeps_column_order_and_comments() -> Result<(), Box<dyn std::error::Error>>
{
    let adapter = RecordingAdapter::new();
    adapter.respond(
        "table_name = 'items'",
        &[("name", "varchar"), ("type", "text"), ("comment", "varchar")],
        vec![
            vec![text("id"), text("integer"), RawValue::Null],
            vec![text("name"), text("varchar(50)"), text("Item name")],
            vec![text("qty"), text("integer"), text("")],
        ],
    );
    let db = Db::new(DatabaseType::Postgres, Arc::new(adapter));

    let rt = Runtime::new()?;
    let schema = rt.block_on(db.table("items").fetch_schema())?;
    assert_eq!(schema, items());
    assert_eq!(
        schema.get("name").map(ColumnType::descriptor),
        Some("varchar(50)|Item name".to_string())
    );

    let missing = rt.block_on(db.fetch_schema("nothing_here"))?;
    assert!(missing.is_empty());
    Ok(())
}

#[test]
fn test02_delete_table_drops_sequence_where_supported() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;

    let pg = RecordingAdapter::new();
    let db = Db::new(DatabaseType::Postgres, Arc::new(pg.clone()));
    rt.block_on(db.table("items").delete_table())?;
    assert_eq!(
        pg.statements(),
        vec![
            "DROP TABLE items".to_string(),
            "DROP SEQUENCE IF EXISTS sq_items".to_string(),
        ]
    );

    let my = RecordingAdapter::new();
    let db = Db::new(DatabaseType::Mysql, Arc::new(my.clone()));
    rt.block_on(db.table("items").delete_table())?;
    assert_eq!(my.statements(), vec!["DROP TABLE items".to_string()]);
    Ok(())
}

#[test]
fn test02_add_and_delete_column() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;

    let ms = RecordingAdapter::new();
    let db = Db::new(DatabaseType::Sqlserver, Arc::new(ms.clone()));
    let table = db.table("items");
    rt.block_on(table.add_column("colour", "nvarchar(20)", "Paint colour"))?;
    rt.block_on(table.add_column("weight", "float", "  "))?;
    rt.block_on(table.delete_column("weight"))?;

    let statements = ms.statements();
    assert_eq!(statements.len(), 4);
    assert_eq!(statements[0], "ALTER TABLE items ADD colour nvarchar(20)");
    assert!(
        statements[1]
            .starts_with("DECLARE @schema sysname = SCHEMA_NAME(); EXEC sp_addextendedproperty")
    );
    assert!(statements[1].contains("N'Paint colour'"));
    assert_eq!(statements[2], "ALTER TABLE items ADD weight float");
    assert_eq!(statements[3], "ALTER TABLE items DROP COLUMN weight");
    Ok(())
}

#[test]
fn test02_listing_and_links() -> Result<(), Box<dyn std::error::Error>> {
    let adapter = RecordingAdapter::new();
    adapter
        .respond(
            "information_schema.tables",
            &[("name", "varchar")],
            vec![vec![text("customer")], vec![text("orders")]],
        )
        .respond(
            "table_name = 'customer'",
            &[("name", "varchar"), ("type", "text"), ("comment", "varchar")],
            vec![vec![text("id"), text("integer"), RawValue::Null]],
        )
        .respond(
            "table_name = 'orders'",
            &[("name", "varchar"), ("type", "text"), ("comment", "varchar")],
            vec![
                vec![text("id"), text("integer"), RawValue::Null],
                vec![text("customer_id"), text("integer"), RawValue::Null],
            ],
        );
    let db = Db::new(DatabaseType::Postgres, Arc::new(adapter));

    let rt = Runtime::new()?;
    assert_eq!(rt.block_on(db.list_tables())?, vec!["customer", "orders"]);
    assert!(rt.block_on(db.list_sequences())?.is_empty());

    let links = rt.block_on(db.links())?;
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].source, "orders");
    assert_eq!(links[0].destination, "customer");

    let mysql = Db::new(DatabaseType::Mysql, Arc::new(RecordingAdapter::new()));
    assert!(matches!(
        rt.block_on(mysql.list_sequences()),
        Err(SqlDbError::Unimplemented(_))
    ));
    Ok(())
}
