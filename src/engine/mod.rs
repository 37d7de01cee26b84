//! Selection and assembly engine.
//!
//! The engine is the only part of the system with nontrivial logic:
//! given tagged units and a filter specification it selects, orders,
//! truncates, and concatenates matching bodies into an output fragment.
//! Everything around it (config, stores, CLI) is plumbing.

use thiserror::Error;

pub mod assembler;
pub mod filter;
pub mod selector;

pub use assembler::{assemble, section_header, write_fragment};
pub use filter::{group_by_labels, TagFilter};
pub use selector::{select, FilterSpec};

/// Errors from selection and assembly.
///
/// Each error aborts the single invocation that raised it; outputs
/// already written by other invocations are untouched.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Requested category does not exist in the metadata store.
    /// Distinct from a known category with zero units, which is empty, not an error.
    #[error("category not found: {category}")]
    CategoryNotFound { category: String },

    /// A selected unit has metadata but no stored body — a referential
    /// integrity violation in the dataset.
    #[error("no body for unit '{unit}' in category '{category}'")]
    MissingBody { category: String, unit: String },

    /// Malformed filter specification, rejected before any store lookup.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
