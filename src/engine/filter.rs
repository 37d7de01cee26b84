//! Filtering primitives shared by the selector and the bibliography splitter.
//!
//! Two instantiations of the same idea: CV units are matched by tag-set
//! intersection, bibliography records by label prefix. Both operate on a
//! flat set of string labels per item.

use std::collections::{BTreeMap, BTreeSet};

/// Include/exclude filter over an item's label set.
///
/// Include has OR semantics: an item matches if it carries any of the
/// include tags, and an empty include set matches everything. Exclude
/// always wins: an item carrying any excluded tag is dropped even when
/// it also carries an included one.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    pub include: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
}

impl TagFilter {
    pub fn new(
        include: impl IntoIterator<Item = impl Into<String>>,
        exclude: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// Does an item with these tags pass the filter?
    pub fn matches(&self, tags: &BTreeSet<String>) -> bool {
        // Exclusion is checked first and is final.
        if tags.iter().any(|t| self.exclude.contains(t)) {
            return false;
        }

        self.include.is_empty() || tags.iter().any(|t| self.include.contains(t))
    }
}

/// Group items under every label they carry.
///
/// Non-exclusive: an item with two labels appears in both groups. Input
/// order is preserved within each group; groups iterate in label order.
pub fn group_by_labels<'a, T, F, I>(items: &'a [T], labels_of: F) -> BTreeMap<String, Vec<&'a T>>
where
    F: Fn(&'a T) -> I,
    I: IntoIterator<Item = String>,
{
    let mut groups: BTreeMap<String, Vec<&T>> = BTreeMap::new();

    for item in items {
        for label in labels_of(item) {
            groups.entry(label).or_default().push(item);
        }
    }

    groups
}

/// Strip `prefix` from each label that carries it, dropping the rest.
///
/// Blank suffixes (a label that is exactly the prefix) are dropped too.
pub fn prefix_suffixes<'a>(
    labels: impl IntoIterator<Item = &'a str> + 'a,
    prefix: &'a str,
) -> impl Iterator<Item = String> + 'a {
    labels
        .into_iter()
        .filter_map(move |label| label.strip_prefix(prefix))
        .map(|suffix| suffix.trim().to_string())
        .filter(|suffix| !suffix.is_empty())
}
