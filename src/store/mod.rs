//! Stores backing the assembly engine.
//!
//! # Storage layout
//!
//! ```text
//! <root>/
//! ├── unit_metadata.yaml        # category -> unit id -> {tags, priority, ...}
//! ├── units/
//! │   └── <category>/
//! │       └── <unit id>.tex     # one body per unit
//! └── sections/
//!     └── <category>_<variant>.tex   # assembled fragments
//! ```
//!
//! Every unit in the metadata file must have a body file and vice versa;
//! [`verify`] reports violations of that invariant.

use anyhow::Result;
use serde::Serialize;

pub mod content;
pub mod metadata;

pub use content::ContentStore;
pub use metadata::{MetadataStore, UnitMeta};

/// One violation of the metadata/body correspondence invariant.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// Unit has metadata but no body file
    MissingBody { category: String, unit: String },

    /// Body file exists with no metadata entry
    OrphanBody { category: String, unit: String },
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityIssue::MissingBody { category, unit } => {
                write!(f, "{}/{}: metadata without body file", category, unit)
            }
            IntegrityIssue::OrphanBody { category, unit } => {
                write!(f, "{}/{}: body file without metadata", category, unit)
            }
        }
    }
}

/// Cross-check the metadata store against the content store.
///
/// Returns every unit with metadata but no body and every body with no
/// metadata. An empty result means the dataset is well formed.
pub async fn verify(
    metadata: &MetadataStore,
    content: &ContentStore,
) -> Result<Vec<IntegrityIssue>> {
    let mut issues = Vec::new();

    for (category, units) in metadata.iter() {
        let bodies = content.list(category).await?;

        for unit in units.keys() {
            if !bodies.iter().any(|b| b == unit) {
                issues.push(IntegrityIssue::MissingBody {
                    category: category.to_string(),
                    unit: unit.clone(),
                });
            }
        }

        for body in bodies {
            if !units.contains_key(&body) {
                issues.push(IntegrityIssue::OrphanBody {
                    category: category.to_string(),
                    unit: body,
                });
            }
        }
    }

    Ok(issues)
}
