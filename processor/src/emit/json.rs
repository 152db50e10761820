//! Per-record JSON definition files.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EmitError, EmitResult};
use crate::logs::{log_error, log_success};
use crate::models::KpiRecord;
use crate::validation::validate_definition;

/// Outcome of writing a batch of definitions.
#[derive(Debug, Default)]
pub struct EmitReport {
    /// Files written, in record order. A path appears twice when two
    /// records share a lowercased code; the later write is what's on disk.
    pub written: Vec<PathBuf>,
    /// One entry per record that could not be written.
    pub failures: Vec<EmitError>,
}

impl EmitReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Serialize a record as 4-space indented JSON.
pub fn to_definition_json(record: &KpiRecord) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    record.serialize(&mut ser)?;
    Ok(buf)
}

/// Write `<code lowercased>.json` for every record into `output_dir`.
///
/// The directory (and its parents) is created when missing; existing files
/// are left alone unless a record overwrites them. Failing to create the
/// directory is an error; a failure on a single file is recorded in the
/// report and the remaining records are still written.
pub fn write_definitions(records: &[KpiRecord], output_dir: &Path) -> EmitResult<EmitReport> {
    fs::create_dir_all(output_dir).map_err(|e| EmitError::io(output_dir, e))?;

    let mut report = EmitReport::default();
    for record in records {
        match write_definition(record, output_dir) {
            Ok(path) => {
                log_success(format!("Generated: {}", path.display()));
                report.written.push(path);
            }
            Err(err) => {
                log_error(err.to_string());
                report.failures.push(err);
            }
        }
    }

    Ok(report)
}

fn write_definition(record: &KpiRecord, output_dir: &Path) -> EmitResult<PathBuf> {
    let json_error = |source: serde_json::Error| EmitError::Json {
        code: record.code.clone(),
        source,
    };

    let value = serde_json::to_value(record).map_err(json_error)?;
    validate_definition(&value).map_err(|errors| EmitError::InvalidDefinition {
        code: record.code.clone(),
        errors,
    })?;

    let bytes = to_definition_json(record).map_err(json_error)?;
    let path = output_dir.join(record.file_name());
    fs::write(&path, bytes).map_err(|e| EmitError::io(&path, e))?;

    Ok(path)
}
