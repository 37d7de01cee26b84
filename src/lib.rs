//! modcv - modular CV assembly
//!
//! Assembles personalized document fragments (CV sections, bibliography
//! subsets) from a library of atomic tagged content units.
//!
//! # Architecture
//!
//! The core is the selection and assembly engine:
//! - Units are filtered by include/exclude tags, ordered by (priority, id),
//!   and truncated to an item limit
//! - Selected bodies are concatenated into a fragment, optionally headed
//! - The same filter/group primitive splits bibliography records into one
//!   output file per prefixed category label
//!
//! # Modules
//!
//! - `store`: metadata and unit-body stores
//! - `engine`: selection, assembly, filtering primitives
//! - `bib`: bibliography records, keyword remapping, splitting
//! - `letter`: cover letter template generation
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Assemble the full education section
//! modcv section education --tags full_cv --include-header --output sections/education_full.tex
//!
//! # Short experience section, capped at three items
//! modcv section experience --tags short_cv --max-items 3
//!
//! # Split the bibliography by publication type
//! modcv bib cv.bib bibs/pub --prefix pub:
//! ```

pub mod bib;
pub mod cli;
pub mod config;
pub mod engine;
pub mod letter;
pub mod store;

// Re-export main types at crate root for convenience
pub use engine::{assemble, select, EngineError, FilterSpec};
pub use store::{ContentStore, IntegrityIssue, MetadataStore, UnitMeta};

// Bibliography splitting
pub use bib::{BibEntry, KeywordMap};
