//! Transformation module.
//!
//! Turns a loaded [`Table`](crate::parser::Table) into KPI records:
//! - Schema: which column layout the table uses
//! - Mapper: row -> [`KpiRecord`](crate::models::KpiRecord) for each layout
//! - Pipeline: the processor that drives loading, mapping, validation and emission

pub mod mapper;
pub mod pipeline;
pub mod schema;

pub use mapper::{cell_text, map_legacy_row, map_new_format_row, map_rows, slugify};
pub use pipeline::*;
pub use schema::{detect_schema, ColumnSchema};
