//! Content store: unit bodies on disk.
//!
//! One file per unit at `<units_dir>/<category>/<id>.tex`. Bodies are
//! opaque text; the store never parses their contents.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

use crate::engine::EngineError;

/// Extension of unit body files
pub const UNIT_EXT: &str = "tex";

/// Lookup of unit bodies by (category, unit id).
#[derive(Debug, Clone)]
pub struct ContentStore {
    units_dir: PathBuf,
}

impl ContentStore {
    pub fn new(units_dir: impl Into<PathBuf>) -> Self {
        Self {
            units_dir: units_dir.into(),
        }
    }

    pub fn units_dir(&self) -> &Path {
        &self.units_dir
    }

    /// Path of the body file for a unit
    pub fn body_path(&self, category: &str, unit: &str) -> PathBuf {
        self.units_dir
            .join(category)
            .join(format!("{}.{}", unit, UNIT_EXT))
    }

    /// Load a unit body, trimmed of surrounding whitespace.
    ///
    /// A missing file is a referential-integrity violation against the
    /// metadata store and is reported as such.
    pub async fn load_body(&self, category: &str, unit: &str) -> Result<String, EngineError> {
        let path = self.body_path(category, unit);

        if !path.exists() {
            return Err(EngineError::MissingBody {
                category: category.to_string(),
                unit: unit.to_string(),
            });
        }

        let content = fs::read_to_string(&path).await?;
        Ok(content.trim().to_string())
    }

    /// Unit ids that have a body file in a category, sorted.
    ///
    /// A category directory that does not exist lists as empty.
    pub async fn list(&self, category: &str) -> Result<Vec<String>> {
        let dir = self.units_dir.join(category);

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut units = Vec::new();
        let mut entries = fs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to read units directory: {}", dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(UNIT_EXT) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    units.push(stem.to_string());
                }
            }
        }

        units.sort();
        Ok(units)
    }
}
