//! Source relation definitions
//!
//! The summary query reads four relations loaded from CSV. Column names are
//! case sensitive join and group keys, so they are checked before querying.

use crate::error::{Error, Result};
use rusqlite::Connection;

/// A source relation and the columns the summary query references.
#[derive(Debug, Clone, Copy)]
pub struct SourceRelation {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Purchase lines
pub const PURCHASES: SourceRelation = SourceRelation {
    name: "purchases",
    columns: &[
        "VendorNumber",
        "VendorName",
        "Brand",
        "Description",
        "PurchasePrice",
        "Quantity",
        "Dollars",
    ],
};

/// Price reference, one row per brand
pub const PURCHASE_PRICES: SourceRelation = SourceRelation {
    name: "purchase_prices",
    columns: &["Brand", "Price", "Volume"],
};

/// Sale lines
pub const SALES: SourceRelation = SourceRelation {
    name: "sales",
    columns: &[
        "VendorNo",
        "Brand",
        "SalesQuantity",
        "SalesDollars",
        "SalesPrice",
        "ExciseTax",
    ],
};

/// Freight / invoice records
pub const VENDOR_INVOICE: SourceRelation = SourceRelation {
    name: "vendor_invoice",
    columns: &["VendorNumber", "Freight"],
};

/// All relations read by the vendor summary query
pub const SOURCE_RELATIONS: [SourceRelation; 4] =
    [PURCHASES, PURCHASE_PRICES, SALES, VENDOR_INVOICE];

/// Returns true if a table named `name` exists.
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

/// Column names of table `name`, in declaration order.
pub fn table_columns(conn: &Connection, name: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let columns = stmt
        .query_map([name], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Check that every source relation exists with its referenced columns.
pub fn verify_sources(conn: &Connection) -> Result<()> {
    for relation in SOURCE_RELATIONS {
        if !table_exists(conn, relation.name)? {
            return Err(Error::MissingRelation(relation.name.to_string()));
        }

        let present = table_columns(conn, relation.name)?;
        let missing: Vec<&str> = relation
            .columns
            .iter()
            .copied()
            .filter(|col| !present.iter().any(|p| p == col))
            .collect();

        if !missing.is_empty() {
            return Err(Error::Schema(format!(
                "relation {} is missing column(s): {}",
                relation.name,
                missing.join(", ")
            )));
        }

        tracing::debug!(relation = relation.name, "Source relation verified");
    }
    Ok(())
}
