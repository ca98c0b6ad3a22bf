//! On-demand export of the current rows as JSON or CSV.
//!
//! Exports are generated from the authoritative sheet when asked for and
//! never persisted. Rows are keyed by column display label, matching what
//! a reader of the grid sees, not by internal ids.

use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::sheet::Sheet;

/// Render the rows as a pretty-printed JSON array of objects keyed by
/// column name
pub fn rows_as_json(sheet: &Sheet) -> CoreResult<String> {
    let rows: Vec<Value> = sheet
        .rows
        .iter()
        .map(|row| {
            let mut object = Map::new();
            for column in &sheet.columns {
                let value = row.cells.get(&column.id).cloned().unwrap_or_default();
                object.insert(column.name.clone(), Value::String(value));
            }
            Value::Object(object)
        })
        .collect();
    serde_json::to_string_pretty(&rows).map_err(CoreError::serialization)
}

/// Render the rows as CSV: one header row of column names, then one line
/// per data row, newline-joined without a trailing newline
pub fn rows_as_csv(sheet: &Sheet) -> CoreResult<String> {
    if sheet.columns.is_empty() {
        return Ok(String::new());
    }
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header: Vec<&str> = sheet.columns.iter().map(|c| c.name.as_str()).collect();
    writer.write_record(&header).map_err(CoreError::serialization)?;

    for row in &sheet.rows {
        let record: Vec<&str> = sheet
            .columns
            .iter()
            .map(|column| row.cells.get(&column.id).map(String::as_str).unwrap_or(""))
            .collect();
        writer.write_record(&record).map_err(CoreError::serialization)?;
    }

    let bytes = writer.into_inner().map_err(CoreError::serialization)?;
    let text = String::from_utf8(bytes).map_err(CoreError::serialization)?;
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridEditor, MemoryGrid};
    use crate::id::CellAddr;
    use crate::sheet::ColumnSpec;
    use crate::ChangeRecord;

    fn one_cell_sheet() -> Sheet {
        let mut grid = MemoryGrid::new();
        grid.add_column(ColumnSpec::text("Title"));
        let row = match grid.add_row() {
            ChangeRecord::RowAdded { row } => row,
            other => panic!("unexpected record {other:?}"),
        };
        let column = grid.sheet().columns[0].id;
        grid.set_cell(CellAddr::new(row, column), "Hello".into())
            .unwrap();
        grid.sheet().clone()
    }

    #[test]
    fn test_json_export_keys_rows_by_column_name() {
        let sheet = one_cell_sheet();
        let json = rows_as_json(&sheet).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["Title"], "Hello");
    }

    #[test]
    fn test_csv_export_header_plus_one_line() {
        let sheet = one_cell_sheet();
        assert_eq!(rows_as_csv(&sheet).unwrap(), "Title\nHello");
    }

    #[test]
    fn test_csv_escapes_commas_and_quotes() {
        let mut grid = MemoryGrid::new();
        grid.add_column(ColumnSpec::text("Notes"));
        let row = match grid.add_row() {
            ChangeRecord::RowAdded { row } => row,
            other => panic!("unexpected record {other:?}"),
        };
        let column = grid.sheet().columns[0].id;
        grid.set_cell(CellAddr::new(row, column), "a, \"b\"".into())
            .unwrap();

        let csv = rows_as_csv(grid.sheet()).unwrap();
        assert_eq!(csv, "Notes\n\"a, \"\"b\"\"\"");
    }

    #[test]
    fn test_empty_sheet_exports_empty_row_set() {
        let sheet = Sheet::empty();
        let parsed: Vec<serde_json::Value> =
            serde_json::from_str(&rows_as_json(&sheet).unwrap()).unwrap();
        assert!(parsed.is_empty());
        assert_eq!(rows_as_csv(&sheet).unwrap(), "");
    }
}
