//! Fragment assembly: resolved bodies to output text.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

use super::EngineError;
use crate::store::ContentStore;

/// Separator between unit bodies in an assembled fragment
const BODY_SEPARATOR: &str = "\n\n";

/// Assemble the bodies of the given units into one fragment.
///
/// Bodies are resolved in the given order; a unit without a body file is
/// a `MissingBody` error even though a well-formed dataset never produces
/// one — the selector's output is not trusted blindly. Empty bodies are
/// skipped. With `include_header`, the category's section header precedes
/// the first body. An empty selection assembles to an empty fragment.
pub async fn assemble(
    content: &ContentStore,
    category: &str,
    units: &[String],
    include_header: bool,
) -> Result<String, EngineError> {
    let mut bodies = Vec::with_capacity(units.len());

    for unit in units {
        let body = content.load_body(category, unit).await?;
        if !body.is_empty() {
            bodies.push(body);
        }
    }

    if bodies.is_empty() {
        debug!(category, "no content assembled");
        return Ok(String::new());
    }

    let mut fragment = String::new();
    if include_header {
        fragment.push_str(&section_header(category));
        fragment.push_str(BODY_SEPARATOR);
    }
    fragment.push_str(&bodies.join(BODY_SEPARATOR));

    Ok(fragment)
}

/// Section header for a category.
///
/// Known categories map to their curated labels; anything else falls back
/// to a title-cased `\section{...}`.
pub fn section_header(category: &str) -> String {
    let label = match category {
        "education" => r"Education, Scholarships \& Distinctions",
        "experience" => "Professional Experience",
        "projects" => r"Open--Source Tools \& Projects",
        "teaching" => "Teaching Experience",
        "skills" => "Technical Skills",
        "publications" => "Publications",
        "activism" => r"Community Service \& Activism",
        other => return format!("\\section{{{}}}", title_case(other)),
    };

    format!("\\section{{{}}}", label)
}

fn title_case(name: &str) -> String {
    name.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write a fragment to its destination, replacing any prior content.
///
/// Parent directories are created as needed. Re-running with identical
/// inputs produces a byte-identical file.
pub async fn write_fragment(fragment: &str, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    fs::write(dest, fragment)
        .await
        .with_context(|| format!("Failed to write fragment: {}", dest.display()))?;

    debug!(dest = %dest.display(), bytes = fragment.len(), "fragment written");
    Ok(())
}
