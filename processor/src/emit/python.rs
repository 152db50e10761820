//! Generated Python registry.
//!
//! Produces a module defining a single dict literal:
//!
//! ```text
//! KPI_REGISTRY = {
//!     "WIN_RATE": {
//!         "name": "Win Rate",
//!         "formula": "Won/Total*100",
//!     },
//! }
//! ```
//!
//! Only `name` and `formula` are carried. Every value goes through
//! [`python_string_literal`], so quotes and backslashes in a KPI name or
//! formula cannot break the generated source. A missing formula is `None`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{EmitError, EmitResult};
use crate::models::KpiRecord;

/// Name of the module-level mapping in the generated file.
pub const REGISTRY_NAME: &str = "KPI_REGISTRY";

const HEADER: &str = "\"\"\"KPI registry generated by kpi-excel-processor. Do not edit.\"\"\"\n\n";

/// Encode `value` as a double-quoted Python string literal.
pub fn python_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render the registry source for `records`, in record order.
///
/// Records sharing a code produce repeated keys; Python keeps the last one.
pub fn render_registry(records: &[KpiRecord]) -> String {
    let mut out = String::from(HEADER);

    if records.is_empty() {
        let _ = writeln!(out, "{} = {{}}", REGISTRY_NAME);
        return out;
    }

    let _ = writeln!(out, "{} = {{", REGISTRY_NAME);
    for record in records {
        let entry = record.registry_entry();
        let formula = entry
            .formula
            .map(python_string_literal)
            .unwrap_or_else(|| "None".to_string());

        let _ = writeln!(out, "    {}: {{", python_string_literal(&record.code));
        let _ = writeln!(out, "        \"name\": {},", python_string_literal(entry.name));
        let _ = writeln!(out, "        \"formula\": {},", formula);
        let _ = writeln!(out, "    }},");
    }
    out.push_str("}\n");
    out
}

/// Write the registry to `path`, replacing any previous content.
pub fn write_registry(records: &[KpiRecord], path: &Path) -> EmitResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| EmitError::io(parent, e))?;
    }
    fs::write(path, render_registry(records)).map_err(|e| EmitError::io(path, e))
}
