//! High-level pipeline API: load, map, validate and emit KPI definitions.
//!
//! # Example
//!
//! ```rust,no_run
//! use kpi_excel_processor::{KpiExcelProcessor, ProcessorOptions};
//! use std::path::{Path, PathBuf};
//!
//! let processor = KpiExcelProcessor::new(ProcessorOptions {
//!     code_file: Some(PathBuf::from("generated/kpi_registry.py")),
//!     ..ProcessorOptions::default()
//! });
//!
//! let summary = processor.run(Path::new("kpis.xlsx"))?;
//! println!("{} definitions written", summary.json.written.len());
//! # Ok::<(), kpi_excel_processor::ProcessorError>(())
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::mapper::map_rows;
use super::schema::{detect_schema, ColumnSchema};
use crate::emit::{write_definitions, write_registry, EmitReport};
use crate::error::{EmitResult, LoadResult, ProcessorResult, RecordError};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::KpiRecord;
use crate::parser::{load_table, SourceFormat};
use crate::validation::validate_record;

/// Default directory for JSON definitions.
pub const DEFAULT_OUTPUT_DIR: &str = "./output/definitions";

/// Options for a processor run
#[derive(Debug, Clone)]
pub struct ProcessorOptions {
    /// Directory receiving one JSON file per KPI
    pub output_dir: PathBuf,

    /// Where to write the generated Python registry; none when unset
    pub code_file: Option<PathBuf>,

    /// CSV delimiter override (auto-detected when unset)
    pub delimiter: Option<char>,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            code_file: None,
            delimiter: None,
        }
    }
}

/// A row that was mapped but failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based position among the data rows.
    pub row: usize,
    pub name: String,
    pub reason: RecordError,
}

/// Records obtained from one input file.
#[derive(Debug, Clone)]
pub struct ParsedBatch {
    /// Base name of the input file
    pub source_file: String,
    pub schema: ColumnSchema,
    /// Valid records, in row order
    pub records: Vec<KpiRecord>,
    pub skipped: Vec<SkippedRecord>,
}

/// What a full run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub source_file: String,
    pub valid_count: usize,
    pub skipped: Vec<SkippedRecord>,
    pub json: EmitReport,
    /// Path of the generated registry, when one was requested
    pub code_file: Option<PathBuf>,
}

/// Converts a KPI spreadsheet or CSV into definition artifacts.
#[derive(Debug, Clone, Default)]
pub struct KpiExcelProcessor {
    options: ProcessorOptions,
}

impl KpiExcelProcessor {
    pub fn new(options: ProcessorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Load `path`, detect its layout and map every row.
    ///
    /// Invalid records are logged and returned in `skipped`; only
    /// file-level problems are errors.
    pub fn parse_file(&self, path: &Path) -> LoadResult<ParsedBatch> {
        let table = load_table(path, self.options.delimiter)?;

        match &table.format {
            SourceFormat::Csv { encoding, delimiter } => {
                log_info_indent(format!("Encoding: {}", encoding), 1);
                log_info_indent(format!("Delimiter: '{}'", format_delimiter(*delimiter)), 1);
            }
            SourceFormat::Spreadsheet { sheet } => {
                log_info_indent(format!("Sheet: {}", sheet), 1);
            }
        }
        log_info_indent(format!("Columns: {}", table.headers.join(", ")), 1);
        log_info_indent(format!("Rows: {}", table.rows.len()), 1);

        let schema = detect_schema(&table.headers)?;
        log_info_indent(format!("Layout: {}", schema), 1);

        let source_file = source_file_name(path);
        let mut records = Vec::new();
        let mut skipped = Vec::new();

        for (index, record) in map_rows(&table.rows, schema, &source_file).into_iter().enumerate() {
            match validate_record(&record) {
                Ok(()) => records.push(record),
                Err(reason) => {
                    log_warning(format!("Skipping invalid KPI '{}': {}", record.name, reason));
                    skipped.push(SkippedRecord {
                        row: index + 1,
                        name: record.name,
                        reason,
                    });
                }
            }
        }

        warn_code_collisions(&records);

        Ok(ParsedBatch {
            source_file,
            schema,
            records,
            skipped,
        })
    }

    /// Write one JSON definition per record into `output_dir`.
    pub fn generate_json_definitions(
        &self,
        records: &[KpiRecord],
        output_dir: &Path,
    ) -> EmitResult<EmitReport> {
        write_definitions(records, output_dir)
    }

    /// Write the Python registry for `records` to `path`.
    pub fn generate_python_code(&self, records: &[KpiRecord], path: &Path) -> EmitResult<()> {
        write_registry(records, path)?;
        log_success(format!("Generated Python code: {}", path.display()));
        Ok(())
    }

    /// Full batch: parse, write JSON definitions, then the registry if one
    /// was requested. Nothing is written when parsing fails.
    pub fn run(&self, input: &Path) -> ProcessorResult<RunSummary> {
        log_info(format!("Processing: {}", input.display()));

        let batch = self.parse_file(input)?;
        log_info(format!("Found {} valid KPIs", batch.records.len()));

        let json = self.generate_json_definitions(&batch.records, &self.options.output_dir)?;

        let code_file = match &self.options.code_file {
            Some(path) => {
                self.generate_python_code(&batch.records, path)?;
                Some(path.clone())
            }
            None => None,
        };

        log_success("Processing complete.");

        Ok(RunSummary {
            source_file: batch.source_file,
            valid_count: batch.records.len(),
            skipped: batch.skipped,
            json,
            code_file,
        })
    }
}

/// Base name of the input path.
fn source_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

/// Codes that map to the same file overwrite each other; say so.
fn warn_code_collisions(records: &[KpiRecord]) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for record in records {
        let file_name = record.file_name();
        if !seen.insert(file_name.clone()) && reported.insert(file_name.clone()) {
            log_warning(format!(
                "Several KPIs map to {}; only the last one is kept",
                file_name
            ));
        }
    }
}
