//! Type normalization and derived ratios for the vendor summary.

use crate::config::RatioPolicy;
use crate::error::{Error, Result};
use crate::types::{Table, Value, VendorSummary};

/// Columns the enricher reads from the aggregated row set.
const REQUIRED_COLUMNS: [&str; 14] = [
    "VendorNumber",
    "VendorName",
    "Brand",
    "Description",
    "PurchasePrice",
    "ActualPrice",
    "Volume",
    "TotalPurchaseQuantity",
    "TotalPurchaseDollars",
    "TotalSalesQuantity",
    "TotalSalesDollars",
    "TotalSalesPrice",
    "TotalExciseTax",
    "FreightCost",
];

const VENDOR_NUMBER: usize = 0;
const VENDOR_NAME: usize = 1;
const BRAND: usize = 2;
const DESCRIPTION: usize = 3;
const PURCHASE_PRICE: usize = 4;
const ACTUAL_PRICE: usize = 5;
const VOLUME: usize = 6;
const TOTAL_PURCHASE_QUANTITY: usize = 7;
const TOTAL_PURCHASE_DOLLARS: usize = 8;
const TOTAL_SALES_QUANTITY: usize = 9;
const TOTAL_SALES_DOLLARS: usize = 10;
const TOTAL_SALES_PRICE: usize = 11;
const TOTAL_EXCISE_TAX: usize = 12;
const FREIGHT_COST: usize = 13;

/// Positions of [`REQUIRED_COLUMNS`] within a row set.
struct ColumnMap([usize; 14]);

impl ColumnMap {
    fn resolve(table: &Table) -> Result<Self> {
        let mut positions = [0; 14];
        let mut missing = Vec::new();
        for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            match table.column_index(name) {
                Some(idx) => *slot = idx,
                None => missing.push(name),
            }
        }

        if !missing.is_empty() {
            return Err(Error::Schema(format!(
                "summary row set is missing column(s): {}",
                missing.join(", ")
            )));
        }
        Ok(Self(positions))
    }

    fn cell<'a>(&self, row: &'a [Value], field: usize) -> &'a Value {
        &row[self.0[field]]
    }
}

/// Normalize the aggregated rows and derive the financial ratios.
///
/// - `VendorNumber` and `Brand` are carried through unchanged
/// - `TotalPurchaseQuantity` becomes an integer count (fractions truncated)
/// - `Volume` becomes a float; other null numerics become zero
/// - `VendorName` is trimmed
/// - gross profit, profit margin, stock turnover and sales-to-purchase
///   ratio are computed, with zero denominators handled by `policy`
///
/// Row order is preserved.
pub fn enrich(table: &Table, policy: RatioPolicy) -> Result<Vec<VendorSummary>> {
    let columns = ColumnMap::resolve(table)?;
    table
        .rows
        .iter()
        .map(|row| enrich_row(&columns, row, policy))
        .collect()
}

fn enrich_row(columns: &ColumnMap, row: &[Value], policy: RatioPolicy) -> Result<VendorSummary> {
    let num = |field: usize| numeric(REQUIRED_COLUMNS[field], columns.cell(row, field));
    let cell_text = |field: usize| text(columns.cell(row, field));

    let total_purchase_dollars = num(TOTAL_PURCHASE_DOLLARS)?;
    let total_sales_quantity = num(TOTAL_SALES_QUANTITY)?;
    let total_sales_dollars = num(TOTAL_SALES_DOLLARS)?;
    let total_purchase_quantity = num(TOTAL_PURCHASE_QUANTITY)?.trunc() as i64;

    let gross_profit = total_sales_dollars - total_purchase_dollars;

    Ok(VendorSummary {
        vendor_number: columns.cell(row, VENDOR_NUMBER).clone(),
        vendor_name: cell_text(VENDOR_NAME).trim().to_string(),
        brand: columns.cell(row, BRAND).clone(),
        description: cell_text(DESCRIPTION),
        purchase_price: num(PURCHASE_PRICE)?,
        actual_price: num(ACTUAL_PRICE)?,
        volume: num(VOLUME)?,
        total_purchase_quantity,
        total_purchase_dollars,
        total_sales_quantity,
        total_sales_dollars,
        total_sales_price: num(TOTAL_SALES_PRICE)?,
        total_excise_tax: num(TOTAL_EXCISE_TAX)?,
        freight_cost: num(FREIGHT_COST)?,
        gross_profit,
        profit_margin: policy.divide(gross_profit, total_sales_dollars) * 100.0,
        stock_turnover: policy.divide(total_sales_quantity, total_purchase_quantity as f64),
        sales_to_purchase_ratio: policy.divide(total_sales_dollars, total_purchase_dollars),
    })
}

/// Read a numeric cell; null is zero and numeric text is parsed.
fn numeric(column: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Null => Ok(0.0),
        Value::Integer(i) => Ok(*i as f64),
        Value::Real(r) => Ok(*r),
        Value::Text(s) if s.trim().is_empty() => Ok(0.0),
        Value::Text(s) => s.trim().parse().map_err(|_| {
            Error::Schema(format!("column {} holds non-numeric value {:?}", column, s))
        }),
        Value::Blob(_) => Err(Error::Schema(format!(
            "column {} holds binary data",
            column
        ))),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnType;

    fn aggregated(rows: Vec<Vec<Value>>) -> Table {
        Table::with_inferred_types(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        )
        .unwrap()
    }

    #[allow(clippy::too_many_arguments)]
    fn row(
        vendor: i64,
        name: &str,
        brand: impl Into<Value>,
        purchase_qty: Value,
        purchase_dollars: f64,
        sales_qty: Value,
        sales_dollars: Value,
        freight: Value,
    ) -> Vec<Value> {
        vec![
            Value::Integer(vendor),
            Value::Text(name.to_string()),
            brand.into(),
            Value::Text("Vodka".into()),
            Value::Real(12.0),
            Value::Real(15.0),
            Value::Text("750".into()),
            purchase_qty,
            Value::Real(purchase_dollars),
            sales_qty,
            sales_dollars,
            Value::Null,
            Value::Null,
            freight,
        ]
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_matched_row_ratios() {
        let table = aggregated(vec![row(
            1,
            "  ACME SPIRITS ",
            100,
            Value::Integer(10),
            100.0,
            Value::Integer(8),
            Value::Real(120.0),
            Value::Real(10.0),
        )]);

        let rows = enrich(&table, RatioPolicy::Propagate).unwrap();
        let r = &rows[0];
        assert_eq!(r.vendor_name, "ACME SPIRITS");
        assert_eq!(r.total_purchase_quantity, 10);
        assert_eq!(r.volume, 750.0);
        assert!(approx(r.gross_profit, 20.0));
        assert!(approx(r.profit_margin, 16.666_666_666_666_668));
        assert!(approx(r.stock_turnover, 0.8));
        assert!(approx(r.sales_to_purchase_ratio, 1.2));
        assert_eq!(r.total_sales_price, 0.0);
        assert_eq!(r.freight_cost, 10.0);
    }

    #[test]
    fn test_unmatched_sales_become_zero() {
        let table = aggregated(vec![row(
            1,
            "ACME",
            200,
            Value::Integer(20),
            170.0,
            Value::Null,
            Value::Null,
            Value::Null,
        )]);

        let r = &enrich(&table, RatioPolicy::Propagate).unwrap()[0];
        assert_eq!(r.total_sales_quantity, 0.0);
        assert_eq!(r.total_sales_dollars, 0.0);
        assert_eq!(r.freight_cost, 0.0);
        assert_eq!(r.gross_profit, -170.0);
        assert_eq!(r.stock_turnover, 0.0);
        assert_eq!(r.sales_to_purchase_ratio, 0.0);
        assert!(r.profit_margin.is_infinite() && r.profit_margin < 0.0);
    }

    #[test]
    fn test_zero_policy_defines_undefined_ratios() {
        let table = aggregated(vec![row(
            3,
            "NOTHING SOLD",
            500,
            Value::Null,
            0.0,
            Value::Null,
            Value::Null,
            Value::Null,
        )]);

        let propagated = &enrich(&table, RatioPolicy::Propagate).unwrap()[0];
        assert!(propagated.profit_margin.is_nan());
        assert!(propagated.stock_turnover.is_nan());

        let zeroed = &enrich(&table, RatioPolicy::Zero).unwrap()[0];
        assert_eq!(zeroed.total_purchase_quantity, 0);
        assert_eq!(zeroed.profit_margin, 0.0);
        assert_eq!(zeroed.stock_turnover, 0.0);
        assert_eq!(zeroed.sales_to_purchase_ratio, 0.0);
    }

    #[test]
    fn test_fractional_quantity_truncates() {
        let table = aggregated(vec![row(
            1,
            "ACME",
            100,
            Value::Real(10.9),
            100.0,
            Value::Integer(5),
            Value::Real(50.0),
            Value::Null,
        )]);
        let r = &enrich(&table, RatioPolicy::Propagate).unwrap()[0];
        assert_eq!(r.total_purchase_quantity, 10);
        assert!(approx(r.stock_turnover, 0.5));
    }

    #[test]
    fn test_gross_profit_identity_and_order() {
        let table = aggregated(vec![
            row(1, "A", 1, Value::Integer(3), 90.0, Value::Integer(1), Value::Real(40.5), Value::Null),
            row(2, "B", 2, Value::Integer(2), 50.0, Value::Null, Value::Null, Value::Null),
            row(3, "C", 3, Value::Integer(1), 10.0, Value::Integer(4), Value::Real(99.25), Value::Null),
        ]);

        let rows = enrich(&table, RatioPolicy::Propagate).unwrap();
        let vendors: Vec<&Value> = rows.iter().map(|r| &r.vendor_number).collect();
        assert_eq!(
            vendors,
            [&Value::Integer(1), &Value::Integer(2), &Value::Integer(3)]
        );
        for r in &rows {
            assert_eq!(r.gross_profit, r.total_sales_dollars - r.total_purchase_dollars);
        }
    }

    #[test]
    fn test_identifiers_pass_through_unchanged() {
        let large_brand = 9_007_199_254_740_993_i64;
        let mut fractional = row(
            4,
            "D",
            large_brand,
            Value::Integer(1),
            5.0,
            Value::Null,
            Value::Null,
            Value::Null,
        );
        fractional[VENDOR_NUMBER] = Value::Real(4.5);

        let table = aggregated(vec![
            row(1, "A", "A".to_string(), Value::Integer(10), 100.0, Value::Integer(8), Value::Real(120.0), Value::Null),
            row(2, "B", 200_i64, Value::Integer(2), 50.0, Value::Null, Value::Null, Value::Null),
            fractional,
        ]);
        assert_eq!(table.columns[BRAND].column_type, ColumnType::Text);

        let rows = enrich(&table, RatioPolicy::Propagate).unwrap();
        assert_eq!(rows[0].brand, Value::Text("A".into()));
        assert!(approx(rows[0].gross_profit, 20.0));
        assert_eq!(rows[1].brand, Value::Integer(200));
        assert_eq!(rows[2].brand, Value::Integer(large_brand));
        assert_eq!(rows[2].vendor_number, Value::Real(4.5));
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let table = Table::with_inferred_types(
            vec!["VendorNumber".into(), "Brand".into()],
            vec![vec![Value::Integer(1), Value::Integer(2)]],
        )
        .unwrap();

        match enrich(&table, RatioPolicy::Propagate) {
            Err(Error::Schema(msg)) => {
                assert!(msg.contains("FreightCost"));
                assert!(!msg.contains("VendorNumber"));
            }
            other => panic!("expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_volume_is_schema_error() {
        let mut r = row(
            1,
            "ACME",
            100,
            Value::Integer(1),
            1.0,
            Value::Null,
            Value::Null,
            Value::Null,
        );
        r[VOLUME] = Value::Text("Unknown".into());
        let table = aggregated(vec![r]);

        assert!(matches!(
            enrich(&table, RatioPolicy::Propagate),
            Err(Error::Schema(_))
        ));
    }
}
