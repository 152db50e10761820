//! Tabular loader: reads a CSV file or the first sheet of a workbook into a
//! [`Table`] of named columns.
//!
//! CSV input gets encoding and delimiter auto-detection; every other
//! extension is handed to the spreadsheet reader. Header names are trimmed
//! before anything downstream sees them. No KPI-specific logic here.

pub mod spreadsheet;

use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{LoadError, LoadResult};

/// One table row: trimmed header -> cell text, `null` for empty cells.
pub type Row = Map<String, Value>;

/// Where a table came from, for operator messages.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceFormat {
    Csv { encoding: String, delimiter: char },
    Spreadsheet { sheet: String },
}

/// A loaded table.
#[derive(Debug, Clone)]
pub struct Table {
    /// Trimmed column headers, in file order.
    pub headers: Vec<String>,
    /// Data rows (blank rows are dropped).
    pub rows: Vec<Row>,
    pub format: SourceFormat,
}

/// Load `path` as a table.
///
/// `.csv` files (any case) go through the CSV reader; `delimiter` overrides
/// detection there and is ignored for workbooks.
pub fn load_table(path: &Path, delimiter: Option<char>) -> LoadResult<Table> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    if is_csv_path(path) {
        let bytes = std::fs::read(path).map_err(|e| LoadError::format(path, e))?;
        parse_csv_bytes(&bytes, delimiter).map_err(|message| LoadError::format(path, message))
    } else {
        spreadsheet::load_first_sheet(path)
    }
}

pub fn is_csv_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode file content, returning the text and the encoding that was used.
///
/// Valid UTF-8 (with or without BOM) is taken as is; anything else goes
/// through chardet, with Windows-1252 as the fallback for labels
/// encoding_rs does not know. Latin-1 is read as Windows-1252, its
/// superset, so quotes, dashes and `€` from spreadsheet exports survive.
pub fn decode_content(bytes: &[u8]) -> (String, String) {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_string(), "utf-8".to_string());
    }

    let encoding = detect_encoding(bytes);
    let decoder = match encoding.as_str() {
        // Already known not to be UTF-8.
        "iso-8859-1" | "utf-8" | "windows-1252" => encoding_rs::WINDOWS_1252,
        other => encoding_rs::Encoding::for_label(other.as_bytes())
            .unwrap_or(encoding_rs::WINDOWS_1252),
    };

    let (text, _, _) = decoder.decode(bytes);
    (text.into_owned(), decoder.name().to_lowercase())
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Comma wins ties and is used when no candidate appears at all.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse raw CSV bytes into a table.
pub fn parse_csv_bytes(bytes: &[u8], delimiter: Option<char>) -> Result<Table, String> {
    let (content, encoding) = decode_content(bytes);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    let (headers, rows) = parse_csv_str(&content, delimiter)?;

    Ok(Table {
        headers,
        rows,
        format: SourceFormat::Csv { encoding, delimiter },
    })
}

/// Parse CSV text with an explicit delimiter.
pub fn parse_csv_str(content: &str, delimiter: char) -> Result<(Vec<String>, Vec<Row>), String> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| format!("delimiter '{}' is not a single ASCII character", delimiter))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err("no header row found".to_string());
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        if let Some(row) = build_row(&headers, record.iter().map(|s| Some(s.to_string()))) {
            rows.push(row);
        }
    }

    Ok((headers, rows))
}

/// Zip headers with cell values. Returns `None` for a row with no content.
///
/// Cells missing at the end of a short row are `null`; unnamed columns are
/// dropped and the first of two identically named columns wins.
pub(crate) fn build_row(
    headers: &[String],
    cells: impl Iterator<Item = Option<String>>,
) -> Option<Row> {
    let mut cells = cells.fuse();
    let mut row = Map::new();
    let mut has_content = false;

    for header in headers {
        let cell = cells.next().flatten().filter(|c| !c.is_empty());
        if header.is_empty() || row.contains_key(header) {
            continue;
        }
        has_content |= cell.as_deref().is_some_and(|c| !c.trim().is_empty());
        row.insert(header.clone(), cell.map(Value::String).unwrap_or(Value::Null));
    }

    has_content.then_some(row)
}
