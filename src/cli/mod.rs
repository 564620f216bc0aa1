//! Maintenance reports behind the `validate`, `measure` and `context-size`
//! subcommands.
//!
//! Each report is built as data first and rendered to plain text second, so
//! the numbers can be tested without capturing stdout.

pub mod context_size;
pub mod measure;
pub mod validate;

pub use context_size::{
    estimate_tokens, format_size, module_status, ContextSizeReport, ModuleStatus, ProjectSize,
};
pub use measure::{format_time, measure_load_time, LoadTimeStats};
pub use validate::{load_linter, run_validation, FileReport, ValidationReport};

const VALID: &str = "✓";
const WARNING: &str = "⚠";
const ERROR: &str = "✗";
