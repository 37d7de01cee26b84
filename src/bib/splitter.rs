//! Bibliography splitting: one output file per category label.
//!
//! The same filter/group primitive as unit selection, instantiated with
//! prefix matching: records whose labels start with the requested prefix
//! are grouped under the label's suffix. Splitting is non-exclusive — a
//! record carrying both `pub:` and `topic:` labels lands in both passes.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::info;

use super::record::BibEntry;
use crate::engine::filter::{group_by_labels, prefix_suffixes};

/// Group entries by the suffix of their prefix-matched labels.
///
/// Input order is preserved inside each group; a record with no matching
/// label is omitted from this pass. Groups iterate in label order.
pub fn split<'a>(entries: &'a [BibEntry], prefix: &str) -> BTreeMap<String, Vec<&'a BibEntry>> {
    group_by_labels(entries, |entry| {
        let labels = entry.labels();
        prefix_suffixes(labels.iter().map(String::as_str), prefix).collect::<Vec<_>>()
    })
}

fn render_group(entries: &[&BibEntry]) -> String {
    let mut out = entries
        .iter()
        .map(|e| e.render())
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}

/// Write one `<label>.bib` per group into `out_dir`.
///
/// Returns (file name, entry count) per written file, in label order.
pub async fn write_splits(
    groups: &BTreeMap<String, Vec<&BibEntry>>,
    out_dir: &Path,
) -> Result<Vec<(String, usize)>> {
    fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(groups.len());

    for (label, entries) in groups {
        let file_name = format!("{}.bib", label);
        let path = out_dir.join(&file_name);
        fs::write(&path, render_group(entries))
            .await
            .with_context(|| format!("Failed to write split: {}", path.display()))?;

        info!(file = %file_name, entries = entries.len(), "split written");
        written.push((file_name, entries.len()));
    }

    Ok(written)
}

/// Write `all.bib` with every entry, unless the file already exists.
///
/// Returns whether the file was written.
pub async fn write_all(entries: &[BibEntry], out_dir: &Path) -> Result<bool> {
    let path = out_dir.join("all.bib");
    if path.exists() {
        return Ok(false);
    }

    fs::create_dir_all(out_dir).await?;
    let refs: Vec<&BibEntry> = entries.iter().collect();
    fs::write(&path, render_group(&refs))
        .await
        .with_context(|| format!("Failed to write all.bib: {}", path.display()))?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<BibEntry> {
        vec![
            BibEntry::new("article", "alpha")
                .with_field("keywords", "pub:journal-article, topic:nlp"),
            BibEntry::new("article", "beta").with_field("keywords", "pub:journal-article"),
            BibEntry::new("misc", "gamma").with_field("keywords", "topic:nlp"),
            BibEntry::new("misc", "delta").with_field("title", "no labels"),
        ]
    }

    #[test]
    fn test_split_by_pub_prefix() {
        let entries = entries();
        let groups = split(&entries, "pub:");

        assert_eq!(groups.len(), 1);
        let journal = &groups["journal-article"];
        assert_eq!(journal.len(), 2);
        assert_eq!(journal[0].key, "alpha");
        assert_eq!(journal[1].key, "beta");
    }

    #[test]
    fn test_split_is_non_exclusive() {
        let entries = entries();

        let pubs = split(&entries, "pub:");
        let topics = split(&entries, "topic:");

        assert!(pubs["journal-article"].iter().any(|e| e.key == "alpha"));
        assert!(topics["nlp"].iter().any(|e| e.key == "alpha"));
    }

    #[test]
    fn test_unlabeled_records_are_omitted() {
        let entries = entries();
        for groups in [split(&entries, "pub:"), split(&entries, "topic:")] {
            assert!(groups.values().flatten().all(|e| e.key != "delta"));
        }
    }

    #[tokio::test]
    async fn test_write_splits_one_file_per_label() {
        let temp = tempfile::TempDir::new().unwrap();
        let entries = entries();
        let groups = split(&entries, "topic:");

        let written = write_splits(&groups, temp.path()).await.unwrap();
        assert_eq!(written, vec![("nlp.bib".to_string(), 2)]);

        let text = std::fs::read_to_string(temp.path().join("nlp.bib")).unwrap();
        assert!(text.contains("@article{alpha,"));
        assert!(text.contains("@misc{gamma,"));
    }

    #[tokio::test]
    async fn test_write_all_respects_existing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let entries = entries();

        assert!(write_all(&entries, temp.path()).await.unwrap());
        let first = std::fs::read_to_string(temp.path().join("all.bib")).unwrap();
        assert!(first.contains("@misc{delta,"));

        std::fs::write(temp.path().join("all.bib"), "hand edited").unwrap();
        assert!(!write_all(&entries, temp.path()).await.unwrap());
        assert_eq!(
            std::fs::read_to_string(temp.path().join("all.bib")).unwrap(),
            "hand edited"
        );
    }
}
