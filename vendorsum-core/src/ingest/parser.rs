//! CSV parsing into row sets
//!
//! The first record is the header. Every record must have the header's
//! field count. Column types are inferred from content:
//! `INTEGER` if every non-empty cell is a 64-bit integer, otherwise `REAL`
//! if every non-empty cell is a float, otherwise `TEXT`. Empty cells are null.

use crate::error::{Error, Result};
use crate::types::{Column, ColumnType, Table, Value};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Parse the CSV file at `path` into a row set.
pub fn read_csv_file(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path)?;
    read_csv(file)
}

/// Parse CSV from any reader into a row set.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = parse_headers(rdr.headers()?)?;

    let records = rdr
        .records()
        .collect::<std::result::Result<Vec<StringRecord>, _>>()?;

    let columns: Vec<Column> = headers
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let column_type = infer_cell_type(records.iter().filter_map(|r| r.get(idx)));
            Column::new(name, column_type)
        })
        .collect();

    let rows: Vec<Vec<Value>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .zip(record.iter())
                .map(|(column, cell)| convert_cell(cell, column.column_type))
                .collect::<Vec<_>>()
        })
        .collect();

    Table::new(columns, rows)
}

fn parse_headers(record: &StringRecord) -> Result<Vec<String>> {
    if record.is_empty() {
        return Err(Error::Schema("CSV has no header row".to_string()));
    }

    let mut seen = HashSet::new();
    let mut headers = Vec::with_capacity(record.len());
    for (idx, raw) in record.iter().enumerate() {
        let name = raw.trim();
        if name.is_empty() {
            return Err(Error::Schema(format!("CSV header {} is empty", idx + 1)));
        }
        if !seen.insert(name.to_string()) {
            return Err(Error::Schema(format!("duplicate CSV header: {}", name)));
        }
        headers.push(name.to_string());
    }
    Ok(headers)
}

fn infer_cell_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut all_integer = true;
    let mut any_value = false;

    for cell in cells.map(str::trim).filter(|c| !c.is_empty()) {
        any_value = true;
        if all_integer && cell.parse::<i64>().is_ok() {
            continue;
        }
        all_integer = false;
        if cell.parse::<f64>().is_err() {
            return ColumnType::Text;
        }
    }

    match (any_value, all_integer) {
        (false, _) => ColumnType::Text,
        (true, true) => ColumnType::Integer,
        (true, false) => ColumnType::Real,
    }
}

fn convert_cell(cell: &str, column_type: ColumnType) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    // Inference guarantees the parses below succeed for their column type
    match column_type {
        ColumnType::Integer => trimmed
            .parse()
            .map(Value::Integer)
            .unwrap_or_else(|_| Value::Text(cell.to_string())),
        ColumnType::Real => trimmed
            .parse()
            .map(Value::Real)
            .unwrap_or_else(|_| Value::Text(cell.to_string())),
        ColumnType::Text => Value::Text(cell.to_string()),
    }
}
