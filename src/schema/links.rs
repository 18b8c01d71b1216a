use serde::Serialize;

use super::TableSchema;

/// A reference from one table to another, inferred from a `<table>_id` column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub source: String,
    pub destination: String,
}

/// Derive links from naming convention alone; no foreign key is consulted.
///
/// `customer_id` links to `customer`; in `billing_customer_id` the token before `_id`
/// (`customer`) is the destination.
#[must_use]
pub fn build_links(schemas: &[TableSchema]) -> Vec<Link> {
    schemas
        .iter()
        .flat_map(|table| {
            table.columns.iter().filter_map(move |column| {
                let stem = column.name.strip_suffix("_id")?;
                let destination = stem.rsplit('_').next().filter(|t| !t.is_empty())?;
                Some(Link {
                    source: table.name.clone(),
                    destination: destination.to_string(),
                })
            })
        })
        .collect()
}
