//! Metadata store: per-category unit records.
//!
//! Backed by a single YAML file mapping category name to unit id to the
//! unit's metadata. Free-form fields beyond tags and priority are kept
//! but not interpreted.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::engine::EngineError;

/// Priority assigned when the metadata file omits one. Units without an
/// explicit priority sort after every deliberately ranked unit.
const DEFAULT_PRIORITY: i64 = 999;

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

/// Metadata for a single content unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitMeta {
    /// Tags used for selective inclusion (e.g. full_cv, short_cv)
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Ordering among selected units; lower sorts first
    #[serde(default = "default_priority")]
    pub priority: i64,

    /// Auxiliary free-form fields (dates, institution, ...), preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for UnitMeta {
    fn default() -> Self {
        Self {
            tags: BTreeSet::new(),
            priority: DEFAULT_PRIORITY,
            extra: BTreeMap::new(),
        }
    }
}

impl UnitMeta {
    /// Create metadata with the given tags and priority (test and tooling helper)
    pub fn new(tags: impl IntoIterator<Item = impl Into<String>>, priority: i64) -> Self {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            priority,
            extra: BTreeMap::new(),
        }
    }
}

/// All unit metadata, keyed by category then unit id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataStore {
    categories: BTreeMap<String, BTreeMap<String, UnitMeta>>,
}

impl MetadataStore {
    /// Load the store from a YAML metadata file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read metadata file: {}", path.display()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse metadata file: {}", path.display()))
    }

    /// Build a store from an in-memory mapping
    pub fn from_map(categories: BTreeMap<String, BTreeMap<String, UnitMeta>>) -> Self {
        Self { categories }
    }

    /// Units of a category.
    ///
    /// An unknown category is an error; a known category with no units
    /// yields an empty map.
    pub fn category(&self, name: &str) -> Result<&BTreeMap<String, UnitMeta>, EngineError> {
        self.categories
            .get(name)
            .ok_or_else(|| EngineError::CategoryNotFound {
                category: name.to_string(),
            })
    }

    /// All category names, in order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Iterate over (category, units) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, UnitMeta>)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Total number of units across all categories
    pub fn unit_count(&self) -> usize {
        self.categories.values().map(|units| units.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
education:
  phd_biomedical_sciences:
    tags: [full_cv, short_cv]
    priority: 1
    dates: "2020--2025"
  bsc_medicine:
    tags: [full_cv]
experience:
  research_assistant:
    tags: [full_cv, academic]
    priority: 2
projects: {}
"#;

    #[test]
    fn test_parse_metadata_yaml() {
        let store: MetadataStore = serde_yaml::from_str(SAMPLE).unwrap();

        assert_eq!(store.categories().count(), 3);
        assert_eq!(store.unit_count(), 3);

        let education = store.category("education").unwrap();
        let phd = &education["phd_biomedical_sciences"];
        assert_eq!(phd.priority, 1);
        assert!(phd.tags.contains("full_cv"));
        assert!(phd.extra.contains_key("dates"));
    }

    #[test]
    fn test_missing_priority_defaults() {
        let store: MetadataStore = serde_yaml::from_str(SAMPLE).unwrap();
        let education = store.category("education").unwrap();
        assert_eq!(education["bsc_medicine"].priority, 999);
    }

    #[test]
    fn test_unknown_category_is_error() {
        let store: MetadataStore = serde_yaml::from_str(SAMPLE).unwrap();
        let err = store.category("awards").unwrap_err();
        assert!(matches!(
            err,
            EngineError::CategoryNotFound { ref category } if category == "awards"
        ));
    }

    #[test]
    fn test_empty_category_is_not_error() {
        let store: MetadataStore = serde_yaml::from_str(SAMPLE).unwrap();
        assert!(store.category("projects").unwrap().is_empty());
    }
}
