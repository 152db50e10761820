//! Record validation.
//!
//! Two checks live here:
//!
//! - [`validate_record`] / [`is_valid`] - the gate every mapped record passes
//!   before emission: non-empty code and name, and no forbidden token in the
//!   formula. The token check is a plain, case-sensitive substring match.
//! - [`validate_definition`] - checks an emitted JSON definition against the
//!   embedded `schemas/metric-definition.json` (JSON Schema Draft 7).
//!
//! # Example
//!
//! ```rust
//! use kpi_excel_processor::{is_valid, KpiMetadata, KpiRecord};
//!
//! let ok = KpiRecord::new("WIN_RATE", "Win Rate", KpiMetadata::from_source("kpis.csv"))
//!     .with_formula(Some("Won/Total*100".into()));
//! assert!(is_valid(&ok));
//!
//! let bad = ok.clone().with_formula(Some("exec(payload)".into()));
//! assert!(!is_valid(&bad));
//! ```

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::RecordError;
use crate::models::KpiRecord;

/// Substrings that may never appear in a formula.
pub const FORBIDDEN_TOKENS: [&str; 3] = ["import", "exec", "eval"];

static DEFINITION_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/metric-definition.json"))
        .expect("Invalid embedded schema")
});

/// Compiled once; every emitted record is checked against it.
static DEFINITION_VALIDATOR: Lazy<Validator> = Lazy::new(|| {
    jsonschema::draft7::new(&DEFINITION_SCHEMA).expect("Embedded schema is not valid Draft 7")
});

/// Check one record. Returns the first failing rule.
pub fn validate_record(record: &KpiRecord) -> Result<(), RecordError> {
    if record.code.is_empty() {
        return Err(RecordError::EmptyCode);
    }
    if record.name.is_empty() {
        return Err(RecordError::EmptyName);
    }
    if let Some(formula) = &record.formula {
        if let Some(token) = FORBIDDEN_TOKENS.into_iter().find(|t| formula.contains(t)) {
            return Err(RecordError::ForbiddenFormula { token });
        }
    }
    Ok(())
}

/// Boolean form of [`validate_record`].
pub fn is_valid(record: &KpiRecord) -> bool {
    validate_record(record).is_ok()
}

/// Validate a serialized definition against the definition schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with every schema violation otherwise
pub fn validate_definition(data: &Value) -> Result<(), Vec<String>> {
    let errors: Vec<String> = DEFINITION_VALIDATOR
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
