//! Core domain types for vendorsum
//!
//! - [`Table`]: a row set of named, typed columns (CSV files, query results)
//! - [`VendorSummary`]: one enriched (vendor, brand) summary row

use crate::error::{Error, Result};
pub use rusqlite::types::Value;

// ============================================
// Row sets
// ============================================

/// SQLite storage class declared for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    /// Returns the SQL type name used in `CREATE TABLE`.
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }

    /// Infer the narrowest type able to hold every value.
    ///
    /// Nulls are ignored; a column holding nothing but nulls is `Text`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut seen_integer = false;
        let mut seen_real = false;

        for value in values {
            match value {
                Value::Null => {}
                Value::Integer(_) => seen_integer = true,
                Value::Real(_) => seen_real = true,
                Value::Text(_) | Value::Blob(_) => return ColumnType::Text,
            }
        }

        if seen_real {
            ColumnType::Real
        } else if seen_integer {
            ColumnType::Integer
        } else {
            ColumnType::Text
        }
    }
}

/// A named column of a [`Table`]
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// An in-memory row set, persisted by the loader as one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column definitions, in order
    pub columns: Vec<Column>,
    /// Row values, each the same length as `columns`
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table from explicit columns, checking every row's width.
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Result<Self> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(Error::Schema(format!(
                "row {} has {} values, expected {}",
                idx,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Build a table whose column types are inferred from the values.
    pub fn with_inferred_types(names: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let column_type = ColumnType::infer(rows.iter().filter_map(|row| row.get(idx)));
                Column::new(name, column_type)
            })
            .collect();
        Self::new(columns, rows)
    }

    /// Position of the column named `name`, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Iterator over column names.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================
// Vendor summary
// ============================================

/// One (vendor, brand) row of the vendor sales summary.
///
/// Numeric fields are never absent: unmatched sales and freight are zero.
/// The vendor and brand identifiers are stored exactly as the source held them.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorSummary {
    pub vendor_number: Value,
    pub vendor_name: String,
    pub brand: Value,
    pub description: String,
    /// List price on the purchase lines
    pub purchase_price: f64,
    /// Price from the price reference
    pub actual_price: f64,
    pub volume: f64,
    pub total_purchase_quantity: i64,
    pub total_purchase_dollars: f64,
    pub total_sales_quantity: f64,
    pub total_sales_dollars: f64,
    pub total_sales_price: f64,
    pub total_excise_tax: f64,
    pub freight_cost: f64,
    /// Sales dollars minus purchase dollars
    pub gross_profit: f64,
    /// Gross profit as a percentage of sales dollars
    pub profit_margin: f64,
    /// Units sold per unit purchased
    pub stock_turnover: f64,
    pub sales_to_purchase_ratio: f64,
}

impl VendorSummary {
    /// Destination column names and types, in table order.
    ///
    /// `None` marks identifier columns whose type is inferred from the rows.
    pub const COLUMNS: [(&'static str, Option<ColumnType>); 18] = [
        ("VendorNumber", None),
        ("VendorName", Some(ColumnType::Text)),
        ("Brand", None),
        ("Description", Some(ColumnType::Text)),
        ("PurchasePrice", Some(ColumnType::Real)),
        ("ActualPrice", Some(ColumnType::Real)),
        ("Volume", Some(ColumnType::Real)),
        ("TotalPurchaseQuantity", Some(ColumnType::Integer)),
        ("TotalPurchaseDollars", Some(ColumnType::Real)),
        ("TotalSalesQuantity", Some(ColumnType::Real)),
        ("TotalSalesDollars", Some(ColumnType::Real)),
        ("TotalSalesPrice", Some(ColumnType::Real)),
        ("TotalExciseTax", Some(ColumnType::Real)),
        ("FreightCost", Some(ColumnType::Real)),
        ("GrossProfit", Some(ColumnType::Real)),
        ("ProfitMargin", Some(ColumnType::Real)),
        ("StockTurnover", Some(ColumnType::Real)),
        ("SalesToPurchaseRatio", Some(ColumnType::Real)),
    ];

    /// Values in [`VendorSummary::COLUMNS`] order.
    pub fn to_row(&self) -> Vec<Value> {
        vec![
            self.vendor_number.clone(),
            Value::Text(self.vendor_name.clone()),
            self.brand.clone(),
            Value::Text(self.description.clone()),
            Value::Real(self.purchase_price),
            Value::Real(self.actual_price),
            Value::Real(self.volume),
            Value::Integer(self.total_purchase_quantity),
            Value::Real(self.total_purchase_dollars),
            Value::Real(self.total_sales_quantity),
            Value::Real(self.total_sales_dollars),
            Value::Real(self.total_sales_price),
            Value::Real(self.total_excise_tax),
            Value::Real(self.freight_cost),
            Value::Real(self.gross_profit),
            Value::Real(self.profit_margin),
            Value::Real(self.stock_turnover),
            Value::Real(self.sales_to_purchase_ratio),
        ]
    }

    /// Convert summary rows into a row set ready for the loader.
    pub fn to_table(rows: &[VendorSummary]) -> Table {
        let rows: Vec<Vec<Value>> = rows.iter().map(VendorSummary::to_row).collect();
        let columns = Self::COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, (name, column_type))| {
                let column_type = column_type
                    .unwrap_or_else(|| ColumnType::infer(rows.iter().map(|row| &row[idx])));
                Column::new(*name, column_type)
            })
            .collect();
        Table { columns, rows }
    }
}
