//! Domain models for the KPI conversion pipeline.
//!
//! - [`KpiRecord`] - One normalized KPI definition, built from one input row
//! - [`RecordKind`] - Fixed tag carried by every record
//! - [`KpiMetadata`] - Auxiliary fields attached to a record
//! - [`RegistryEntry`] - The reduced view written to the generated registry

use serde::{Deserialize, Serialize};

// =============================================================================
// Record Kind
// =============================================================================

/// Tag identifying what a definition file describes.
///
/// Only metric definitions are produced today.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    MetricDefinition,
}

// =============================================================================
// Metadata
// =============================================================================

/// Auxiliary fields of a KPI record.
///
/// `source_file` is always present. The narrative fields are only set by the
/// new-format mapper, where they default to an empty string; legacy rows leave
/// them out of the serialized object entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KpiMetadata {
    /// Base name of the input file the record came from.
    pub source_file: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_insights: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_approach: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization_suggestions: Option<String>,
}

impl KpiMetadata {
    /// Metadata with only the source file set (legacy layout).
    pub fn from_source(source_file: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            ..Self::default()
        }
    }
}

// =============================================================================
// KPI Record
// =============================================================================

/// A normalized KPI definition.
///
/// Serialized field order is `kind, code, name, description, formula,
/// metadata`; absent `description`/`formula` serialize as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KpiRecord {
    pub kind: RecordKind,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub formula: Option<String>,
    pub metadata: KpiMetadata,
}

impl KpiRecord {
    pub fn new(code: impl Into<String>, name: impl Into<String>, metadata: KpiMetadata) -> Self {
        Self {
            kind: RecordKind::MetricDefinition,
            code: code.into(),
            name: name.into(),
            description: None,
            formula: None,
            metadata,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_formula(mut self, formula: Option<String>) -> Self {
        self.formula = formula;
        self
    }

    /// File name of the JSON definition for this record.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.code.to_lowercase())
    }

    pub fn registry_entry(&self) -> RegistryEntry<'_> {
        RegistryEntry {
            name: &self.name,
            formula: self.formula.as_deref(),
        }
    }
}

// =============================================================================
// Registry Entry
// =============================================================================

/// Name/formula pair written to the generated registry, keyed by code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry<'a> {
    pub name: &'a str,
    pub formula: Option<&'a str>,
}
