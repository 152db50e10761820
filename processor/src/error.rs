//! Error types for the KPI conversion pipeline.
//!
//! - [`LoadError`] - Fatal errors while reading and interpreting the input table
//! - [`RecordError`] - A single row that fails validation (never fatal)
//! - [`EmitError`] - Failures while writing artifacts
//! - [`ProcessorError`] - Top-level error returned to the batch driver
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

use crate::transform::schema::NEW_FORMAT_COLUMNS;

// =============================================================================
// Loading Errors
// =============================================================================

/// Errors while loading the input file and detecting its column layout.
///
/// Every variant aborts the run.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Input path does not exist.
    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// File exists but could not be read as a table.
    #[error("Failed to read {} as tabular data: {message}", .path.display())]
    Format { path: PathBuf, message: String },

    /// Neither the new nor the legacy column layout is present.
    ///
    /// `missing` always lists columns of the new format, which is the
    /// layout operators are expected to provide.
    #[error(
        "Missing required columns: {}. Expected columns: {}",
        .missing.join(", "),
        NEW_FORMAT_COLUMNS.join(", ")
    )]
    Schema { missing: Vec<String> },
}

impl LoadError {
    pub fn format(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Format {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

// =============================================================================
// Record Errors
// =============================================================================

/// Reasons a mapped record is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("code is empty")]
    EmptyCode,

    #[error("name is empty")]
    EmptyName,

    /// Formula contains a token that is never allowed in a formula.
    #[error("formula contains forbidden token '{token}'")]
    ForbiddenFormula { token: &'static str },
}

// =============================================================================
// Emission Errors
// =============================================================================

/// Errors while writing JSON definitions or the generated registry.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {code}: {source}")]
    Json {
        code: String,
        #[source]
        source: serde_json::Error,
    },

    /// Emitted definition does not match the definition schema.
    #[error("Definition {code} does not match schema: {}", .errors.join("; "))]
    InvalidDefinition { code: String, errors: Vec<String> },
}

impl EmitError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// =============================================================================
// Processor Errors (top-level)
// =============================================================================

/// Top-level error returned by [`crate::KpiExcelProcessor::run`].
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for artifact emission.
pub type EmitResult<T> = Result<T, EmitError>;

/// Result type for the whole run.
pub type ProcessorResult<T> = Result<T, ProcessorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_new_format_columns() {
        let err = LoadError::Schema {
            missing: vec!["Definition".into(), "Standard Formula".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Missing required columns: Definition, Standard Formula"));
        assert!(msg.contains("KPI"));
    }

    #[test]
    fn test_error_conversion_chain() {
        let load_err = LoadError::NotFound {
            path: PathBuf::from("kpis.csv"),
        };
        let err: ProcessorError = load_err.into();
        assert!(err.to_string().contains("kpis.csv"));

        let emit_err = EmitError::io(
            "out/registry.py",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let err: ProcessorError = emit_err.into();
        assert!(err.to_string().contains("registry.py"));
    }

    #[test]
    fn test_record_error_format() {
        let err = RecordError::ForbiddenFormula { token: "eval" };
        assert_eq!(err.to_string(), "formula contains forbidden token 'eval'");
    }
}
