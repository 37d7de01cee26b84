//! Keyword remapping for bibliography records.
//!
//! A plain-text map file rewrites legacy keywords to their canonical
//! prefixed form, one `old -> new` pair per line. After remapping, only
//! keywords carrying a recognized prefix are kept.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

use super::record::BibEntry;

/// Prefixes a keyword must carry to survive normalization
pub const DEFAULT_VALID_PREFIXES: &[&str] = &["pub:", "topic:", "meta:"];

/// Keyword rewrite table loaded from a map file.
#[derive(Debug, Clone, Default)]
pub struct KeywordMap {
    map: BTreeMap<String, String>,
}

impl KeywordMap {
    /// Load a map file. A missing file yields an empty map, not an error.
    ///
    /// Lines are `old -> new`; blank lines and `#` comments are ignored.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read keyword map: {}", path.display()))?;

        let mut map = BTreeMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((old, new)) = line.split_once(" -> ") {
                map.insert(old.trim().to_string(), new.trim().to_string());
            }
        }

        debug!(entries = map.len(), path = %path.display(), "keyword map loaded");
        Ok(Self { map })
    }

    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        Self {
            map: pairs
                .into_iter()
                .map(|(old, new)| (old.into(), new.into()))
                .collect(),
        }
    }

    /// Canonical form of a keyword (identity when unmapped)
    pub fn remap<'a>(&'a self, keyword: &'a str) -> &'a str {
        self.map.get(keyword).map(String::as_str).unwrap_or(keyword)
    }

    /// Normalize an entry's keywords in place.
    ///
    /// Each keyword is remapped, then dropped unless it starts with one of
    /// `valid_prefixes`. The keywords field is removed entirely when no
    /// keyword survives.
    pub fn apply(&self, entry: &mut BibEntry, valid_prefixes: &[String]) {
        let Some(keywords) = entry.field("keywords") else {
            return;
        };

        let kept: Vec<String> = keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| self.remap(k).to_string())
            .filter(|k| valid_prefixes.iter().any(|p| k.starts_with(p.as_str())))
            .collect();

        if kept.is_empty() {
            entry.remove_field("keywords");
        } else {
            entry.set_field("keywords", kept.join(", "));
        }
    }
}
