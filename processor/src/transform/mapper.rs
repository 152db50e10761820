//! Row mapping for both column layouts.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::schema::ColumnSchema;
use crate::models::{KpiMetadata, KpiRecord};
use crate::parser::Row;

pub const COL_KPI: &str = "KPI";
pub const COL_DEFINITION: &str = "Definition";
pub const COL_STANDARD_FORMULA: &str = "Standard Formula";
pub const COL_BUSINESS_INSIGHTS: &str = "Business Insights";
pub const COL_MEASUREMENT_APPROACH: &str = "Measurement Approach";
pub const COL_VISUALIZATION_SUGGESTIONS: &str = "Visualization Suggestions";

pub const COL_CODE: &str = "Code";
pub const COL_NAME: &str = "Name";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_FORMULA: &str = "Formula";

static NON_CODE_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Z0-9]").expect("valid code character pattern"));

/// Derive a machine code from a KPI name.
///
/// The name is uppercased, then every character that is not an ASCII
/// letter or digit becomes `_`. No collision handling.
///
/// ```
/// use kpi_excel_processor::slugify;
/// assert_eq!(slugify("Average Sales Call Duration"), "AVERAGE_SALES_CALL_DURATION");
/// ```
pub fn slugify(name: &str) -> String {
    NON_CODE_CHAR.replace_all(&name.to_uppercase(), "_").into_owned()
}

/// Read a cell as trimmed text. Missing, `null` and blank cells are `None`.
pub fn cell_text(row: &Row, column: &str) -> Option<String> {
    let text = match row.get(column)? {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    };

    (!text.is_empty()).then_some(text)
}

/// Map a `KPI` / `Definition` / `Standard Formula` row.
pub fn map_new_format_row(row: &Row, source_file: &str) -> KpiRecord {
    let name = cell_text(row, COL_KPI).unwrap_or_default();
    let narrative = |column: &str| Some(cell_text(row, column).unwrap_or_default());

    let metadata = KpiMetadata {
        source_file: source_file.to_string(),
        business_insights: narrative(COL_BUSINESS_INSIGHTS),
        measurement_approach: narrative(COL_MEASUREMENT_APPROACH),
        visualization_suggestions: narrative(COL_VISUALIZATION_SUGGESTIONS),
    };

    KpiRecord::new(slugify(&name), name, metadata)
        .with_description(cell_text(row, COL_DEFINITION))
        .with_formula(cell_text(row, COL_STANDARD_FORMULA))
}

/// Map a `Code` / `Name` row. The code is kept as written.
pub fn map_legacy_row(row: &Row, source_file: &str) -> KpiRecord {
    KpiRecord::new(
        cell_text(row, COL_CODE).unwrap_or_default(),
        cell_text(row, COL_NAME).unwrap_or_default(),
        KpiMetadata::from_source(source_file),
    )
    .with_description(cell_text(row, COL_DESCRIPTION))
    .with_formula(cell_text(row, COL_FORMULA))
}

/// Map every row with the rule for `schema`.
pub fn map_rows(rows: &[Row], schema: ColumnSchema, source_file: &str) -> Vec<KpiRecord> {
    let map_row: fn(&Row, &str) -> KpiRecord = match schema {
        ColumnSchema::New => map_new_format_row,
        ColumnSchema::Legacy => map_legacy_row,
    };

    rows.iter().map(|row| map_row(row, source_file)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Win Rate"), "WIN_RATE");
        assert_eq!(slugify("Net Promoter Score (NPS)"), "NET_PROMOTER_SCORE__NPS_");
        assert_eq!(slugify("Revenue/Employee"), "REVENUE_EMPLOYEE");
        assert_eq!(slugify("Café Sales"), "CAF__SALES");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_is_idempotent_and_restricted() {
        for name in ["Win Rate", "Über-Growth 2024!", "  spaced  ", "a\tb\nc", "日本"] {
            let code = slugify(name);
            assert_eq!(slugify(&code), code);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'));
        }
    }

    #[test]
    fn test_cell_text() {
        let r = row(json!({ "a": "  x  ", "b": "   ", "c": null, "d": 3 }));
        assert_eq!(cell_text(&r, "a"), Some("x".to_string()));
        assert_eq!(cell_text(&r, "b"), None);
        assert_eq!(cell_text(&r, "c"), None);
        assert_eq!(cell_text(&r, "d"), Some("3".to_string()));
        assert_eq!(cell_text(&r, "missing"), None);
    }

    #[test]
    fn test_map_new_format_row() {
        let r = row(json!({
            "KPI": " Win Rate ",
            "Definition": "Percent of deals won",
            "Standard Formula": "Won/Total*100",
            "Business Insights": "Tracks sales effectiveness",
        }));
        let record = map_new_format_row(&r, "sales.csv");

        assert_eq!(record.code, "WIN_RATE");
        assert_eq!(record.name, "Win Rate");
        assert_eq!(record.description.as_deref(), Some("Percent of deals won"));
        assert_eq!(record.formula.as_deref(), Some("Won/Total*100"));
        assert_eq!(record.metadata.source_file, "sales.csv");
        assert_eq!(
            record.metadata.business_insights.as_deref(),
            Some("Tracks sales effectiveness")
        );
        assert_eq!(record.metadata.measurement_approach.as_deref(), Some(""));
        assert_eq!(record.metadata.visualization_suggestions.as_deref(), Some(""));
    }

    #[test]
    fn test_map_new_format_row_empty_cells() {
        let r = row(json!({ "KPI": null, "Definition": "", "Standard Formula": null }));
        let record = map_new_format_row(&r, "x.csv");

        assert_eq!(record.name, "");
        assert_eq!(record.code, "");
        assert_eq!(record.description, None);
        assert_eq!(record.formula, None);
    }

    #[test]
    fn test_map_legacy_row_keeps_code_verbatim() {
        let r = row(json!({
            "Code": "cac-v2",
            "Name": "Customer Acquisition Cost",
            "Description": "Cost per new customer",
            "Formula": "Spend/NewCustomers",
        }));
        let record = map_legacy_row(&r, "legacy.csv");

        assert_eq!(record.code, "cac-v2");
        assert_eq!(record.formula.as_deref(), Some("Spend/NewCustomers"));
        assert_eq!(record.metadata, KpiMetadata::from_source("legacy.csv"));
    }

    #[test]
    fn test_map_legacy_row_without_optional_columns() {
        let r = row(json!({ "Code": "CAC", "Name": "Customer Acquisition Cost" }));
        let record = map_legacy_row(&r, "legacy.csv");

        assert_eq!(record.description, None);
        assert_eq!(record.formula, None);
    }

    #[test]
    fn test_map_rows_uses_schema() {
        let rows = vec![row(json!({ "Code": "A", "Name": "Alpha", "KPI": "Ignored" }))];
        let records = map_rows(&rows, ColumnSchema::Legacy, "f.csv");
        assert_eq!(records[0].code, "A");

        let rows = vec![row(json!({
            "KPI": "Alpha Beta",
            "Definition": null,
            "Standard Formula": null,
        }))];
        let records = map_rows(&rows, ColumnSchema::New, "f.csv");
        assert_eq!(records[0].code, "ALPHA_BETA");
    }
}
