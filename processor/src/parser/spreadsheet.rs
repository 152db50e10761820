//! Workbook reading (xlsx, xls, xlsb, ods) via calamine. First sheet only.

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use super::{build_row, SourceFormat, Table};
use crate::error::{LoadError, LoadResult};

/// Read the first sheet of a workbook; its first used row is the header.
pub fn load_first_sheet(path: &Path) -> LoadResult<Table> {
    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::format(path, e))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::format(path, "workbook has no sheets"))?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| LoadError::format(path, e))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|cells| {
            cells
                .iter()
                .map(|c| cell_text(c).unwrap_or_default().trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    if headers.iter().all(String::is_empty) {
        return Err(LoadError::format(path, format!("sheet '{}' has no header row", sheet)));
    }

    let rows = rows
        .filter_map(|cells| build_row(&headers, cells.iter().map(cell_text)))
        .collect();

    Ok(Table {
        headers,
        rows,
        format: SourceFormat::Spreadsheet { sheet },
    })
}

/// Text of a cell. Whole floats print without a fractional part so that a
/// numeric column reads the same as it would in a CSV export.
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::io::Write;

    fn write_kpi_workbook(path: &Path) {
        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, " KPI ").unwrap();
        sheet.write_string(0, 1, "Definition  ").unwrap();
        sheet.write_string(0, 2, "Standard Formula").unwrap();
        sheet.write_string(1, 0, "Win Rate").unwrap();
        sheet.write_number(1, 1, 42.0).unwrap();
        sheet.write_string(1, 2, "Won/Total*100").unwrap();
        sheet.write_string(3, 0, "Close Ratio").unwrap();
        sheet.write_number(3, 1, 0.5).unwrap();

        let archive = workbook.add_worksheet();
        archive.set_name("Archive").unwrap();
        archive.write_string(0, 0, "Code").unwrap();
        archive.write_string(0, 1, "Name").unwrap();
        archive.write_string(1, 0, "OLD").unwrap();
        archive.write_string(1, 1, "Old Metric").unwrap();

        workbook.save(path).unwrap();
    }

    #[test]
    fn test_first_sheet_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kpis.xlsx");
        write_kpi_workbook(&path);

        let table = load_first_sheet(&path).unwrap();
        assert_eq!(table.headers, vec!["KPI", "Definition", "Standard Formula"]);
        assert_eq!(table.format, SourceFormat::Spreadsheet { sheet: "Sheet1".into() });

        // The blank third row is dropped.
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["KPI"], "Win Rate");
        assert_eq!(table.rows[0]["Definition"], "42");
        assert_eq!(table.rows[0]["Standard Formula"], "Won/Total*100");
        assert_eq!(table.rows[1]["Definition"], "0.5");
        assert!(table.rows[1]["Standard Formula"].is_null());
        assert!(table.rows.iter().all(|r| !r.contains_key("Code")));
    }

    #[test]
    fn test_header_only_sheet_has_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Code").unwrap();
        sheet.write_string(0, 1, "Name").unwrap();
        workbook.save(&path).unwrap();

        let table = load_first_sheet(&path).unwrap();
        assert_eq!(table.headers, vec!["Code", "Name"]);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String("Win Rate".into())), Some("Win Rate".into()));
        assert_eq!(cell_text(&Data::Float(42.0)), Some("42".into()));
        assert_eq!(cell_text(&Data::Float(0.5)), Some("0.5".into()));
        assert_eq!(cell_text(&Data::Int(7)), Some("7".into()));
        assert_eq!(cell_text(&Data::Bool(true)), Some("true".into()));
    }

    #[test]
    fn test_corrupt_workbook_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kpis.xlsx");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"this is not a zip archive").unwrap();

        let err = load_first_sheet(&path).unwrap_err();
        assert!(matches!(err, LoadError::Format { .. }));
    }

    #[test]
    fn test_unknown_extension_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kpis.txt");
        std::fs::write(&path, "KPI,Definition,Standard Formula\n").unwrap();

        let err = load_first_sheet(&path).unwrap_err();
        assert!(matches!(err, LoadError::Format { .. }));
    }
}
