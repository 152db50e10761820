//! Artifact writers.
//!
//! - [`json`] - one pretty-printed JSON definition per record
//! - [`python`] - a single generated `KPI_REGISTRY` module

pub mod json;
pub mod python;

pub use json::{to_definition_json, write_definitions, EmitReport};
pub use python::{python_string_literal, render_registry, write_registry, REGISTRY_NAME};
