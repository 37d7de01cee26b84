//! Unit selection: filter, order, truncate.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::filter::TagFilter;
use super::EngineError;
use crate::store::MetadataStore;

/// A complete selection request for one category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Category to select from (education, experience, ...)
    pub category: String,

    /// Keep units carrying any of these tags; empty means keep all
    #[serde(default)]
    pub include_tags: BTreeSet<String>,

    /// Drop units carrying any of these tags; exclusion is final
    #[serde(default)]
    pub exclude_tags: BTreeSet<String>,

    /// Hard cap on the number of units, applied after ordering
    #[serde(default)]
    pub max_items: Option<usize>,
}

impl FilterSpec {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn include(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.include_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn exclude(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Reject malformed specs before any store lookup happens.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.category.trim().is_empty() {
            return Err(EngineError::InvalidFilter(
                "category must not be empty".to_string(),
            ));
        }

        for tag in self.include_tags.iter().chain(self.exclude_tags.iter()) {
            if tag.trim().is_empty() {
                return Err(EngineError::InvalidFilter(
                    "tags must not be blank".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Select unit ids matching a filter spec, in output order.
///
/// Survivors are sorted by (priority ascending, unit id ascending); the
/// id tie-break keeps output stable across runs. `max_items` keeps the
/// leading entries of the sorted list, so a limited selection is always
/// a prefix of the unlimited one. `max_items = 0` is a valid request for
/// an empty selection.
pub fn select(store: &MetadataStore, spec: &FilterSpec) -> Result<Vec<String>, EngineError> {
    spec.validate()?;

    let units = store.category(&spec.category)?;
    let filter = TagFilter {
        include: spec.include_tags.clone(),
        exclude: spec.exclude_tags.clone(),
    };

    let mut selected: Vec<(i64, &str)> = units
        .iter()
        .filter(|(_, meta)| filter.matches(&meta.tags))
        .map(|(id, meta)| (meta.priority, id.as_str()))
        .collect();

    selected.sort();

    if let Some(max) = spec.max_items {
        selected.truncate(max);
    }

    debug!(
        category = %spec.category,
        selected = selected.len(),
        total = units.len(),
        "selected units"
    );

    Ok(selected.into_iter().map(|(_, id)| id.to_string()).collect())
}
