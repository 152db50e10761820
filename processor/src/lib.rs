//! # KPI Excel Processor - spreadsheet KPI definitions to JSON and code
//!
//! Reads a CSV file or the first sheet of a workbook describing business
//! KPIs and emits one JSON definition per KPI, plus an optional generated
//! Python registry.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ CSV / XLSX  │────▶│   Parser    │────▶│  Transform  │────▶│    Emit     │
//! │             │     │ (auto-enc)  │     │ (map+check) │     │ (JSON / py) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kpi_excel_processor::{KpiExcelProcessor, ProcessorOptions};
//! use std::path::Path;
//!
//! let processor = KpiExcelProcessor::new(ProcessorOptions::default());
//! let summary = processor.run(Path::new("kpis.csv")).unwrap();
//! println!("Wrote {} definitions", summary.json.written.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - KPI record model
//! - [`parser`] - CSV and spreadsheet loading
//! - [`transform`] - Layout detection, row mapping and the processor
//! - [`validation`] - Record and definition checks
//! - [`emit`] - JSON definition and Python registry writers
//! - [`logs`] - Operator messages

// Core modules
pub mod error;
pub mod models;

// Loading
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Output
pub mod emit;

pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{EmitError, LoadError, ProcessorError, RecordError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{KpiMetadata, KpiRecord, RecordKind, RegistryEntry};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{load_table, Row, SourceFormat, Table};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    cell_text, detect_schema, map_legacy_row, map_new_format_row, map_rows, slugify,
    ColumnSchema, KpiExcelProcessor, ParsedBatch, ProcessorOptions, RunSummary, SkippedRecord,
    DEFAULT_OUTPUT_DIR,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{is_valid, validate_definition, validate_record, FORBIDDEN_TOKENS};

// =============================================================================
// Re-exports - Emitters
// =============================================================================

pub use emit::{
    python_string_literal, render_registry, to_definition_json, write_definitions,
    write_registry, EmitReport, REGISTRY_NAME,
};
