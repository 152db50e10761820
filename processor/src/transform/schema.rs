//! Column layout detection.

use std::fmt;

use crate::error::{LoadError, LoadResult};

/// Columns that identify the current spreadsheet layout.
pub const NEW_FORMAT_COLUMNS: [&str; 3] = ["KPI", "Definition", "Standard Formula"];

/// Columns that identify the older code/name layout.
pub const LEGACY_FORMAT_COLUMNS: [&str; 2] = ["Code", "Name"];

/// Supported column layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSchema {
    /// `KPI` / `Definition` / `Standard Formula`, code derived from the name.
    New,
    /// `Code` / `Name` / `Description` / `Formula`, code taken verbatim.
    Legacy,
}

impl fmt::Display for ColumnSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new format ({})", NEW_FORMAT_COLUMNS.join(", ")),
            Self::Legacy => write!(f, "legacy format ({})", LEGACY_FORMAT_COLUMNS.join(", ")),
        }
    }
}

/// Pick the layout for a set of (already trimmed) headers.
///
/// The new format wins whenever all of its columns are present. Otherwise
/// the legacy layout is used if `Code` and `Name` both exist. When neither
/// matches, the error lists the missing new-format columns.
pub fn detect_schema(headers: &[String]) -> LoadResult<ColumnSchema> {
    let has = |column: &str| headers.iter().any(|h| h == column);

    let missing: Vec<String> = NEW_FORMAT_COLUMNS
        .into_iter()
        .filter(|&c| !has(c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(ColumnSchema::New);
    }

    if LEGACY_FORMAT_COLUMNS.into_iter().all(has) {
        return Ok(ColumnSchema::Legacy);
    }

    Err(LoadError::Schema { missing })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_format() {
        let h = headers(&["KPI", "Definition", "Standard Formula", "Business Insights"]);
        assert_eq!(detect_schema(&h).unwrap(), ColumnSchema::New);
    }

    #[test]
    fn test_legacy_fallback() {
        let h = headers(&["Code", "Name", "Description", "Formula"]);
        assert_eq!(detect_schema(&h).unwrap(), ColumnSchema::Legacy);
    }

    #[test]
    fn test_new_format_preferred_when_both_present() {
        let h = headers(&["Code", "Name", "KPI", "Definition", "Standard Formula"]);
        assert_eq!(detect_schema(&h).unwrap(), ColumnSchema::New);
    }

    #[test]
    fn test_partial_new_format_with_legacy_columns() {
        let h = headers(&["KPI", "Code", "Name"]);
        assert_eq!(detect_schema(&h).unwrap(), ColumnSchema::Legacy);
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let h = headers(&["kpi", "definition", "standard formula"]);
        let err = detect_schema(&h).unwrap_err();
        match err {
            LoadError::Schema { missing } => {
                assert_eq!(missing, vec!["KPI", "Definition", "Standard Formula"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_lists_only_absent_new_columns() {
        let h = headers(&["KPI", "Name"]);
        match detect_schema(&h).unwrap_err() {
            LoadError::Schema { missing } => {
                assert_eq!(missing, vec!["Definition", "Standard Formula"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
