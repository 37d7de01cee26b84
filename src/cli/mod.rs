//! Command-line interface for modcv.
//!
//! Provides commands for assembling CV sections, splitting bibliographies,
//! inspecting the unit library, and generating cover letter templates.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::fs;

use crate::bib::{self, KeywordMap};
use crate::config;
use crate::engine::{assemble, select, write_fragment, EngineError, FilterSpec};
use crate::letter::{create_cover_letter, LetterSpec};
use crate::store::{self, ContentStore, IntegrityIssue, MetadataStore};

/// modcv - assemble modular CV sections and bibliography splits
#[derive(Parser, Debug)]
#[command(name = "modcv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble a section from tagged units
    Section {
        /// Section category (education, experience, projects, ...)
        category: String,

        /// Include units carrying any of these tags
        #[arg(short, long, num_args = 1..)]
        tags: Vec<String>,

        /// Exclude units carrying any of these tags (exclusion wins)
        #[arg(short = 'x', long, num_args = 1..)]
        exclude_tags: Vec<String>,

        /// Maximum number of units, applied after ordering
        #[arg(short, long)]
        max_items: Option<i64>,

        /// Prepend the section header
        #[arg(long)]
        include_header: bool,

        /// Output file (prints to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Split a bibliography into per-category .bib files
    Bib {
        /// Input .bib file
        input: PathBuf,

        /// Output directory
        out_dir: PathBuf,

        /// Category label prefix to split on
        #[arg(short, long, default_value = "pub:")]
        prefix: String,

        /// Keyword remap file (old -> new per line)
        #[arg(long, default_value = "keyword-map.txt")]
        keyword_map: PathBuf,

        /// Keyword prefixes to keep after remapping
        #[arg(long, num_args = 1.., default_values_t = bib::DEFAULT_VALID_PREFIXES.iter().map(|p| p.to_string()))]
        valid_prefixes: Vec<String>,
    },

    /// Show unit library status and health
    Status {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a cover letter template
    Letter {
        /// Directory to create cover_letter.tex in
        directory: PathBuf,

        /// Organization name
        #[arg(long)]
        organization: String,

        /// Organization location
        #[arg(long)]
        location: String,

        /// Recipient title
        #[arg(long, default_value = "Hiring Manager")]
        recipient: String,

        /// Letter opening line
        #[arg(long, default_value = "Dear Hiring Manager,")]
        opening: String,

        /// File containing the letter body (default body if omitted)
        #[arg(long)]
        content: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Section {
                category,
                tags,
                exclude_tags,
                max_items,
                include_header,
                output,
            } => {
                build_section(
                    &category,
                    tags,
                    exclude_tags,
                    max_items,
                    include_header,
                    output,
                )
                .await
            }
            Commands::Bib {
                input,
                out_dir,
                prefix,
                keyword_map,
                valid_prefixes,
            } => split_bibliography(&input, &out_dir, &prefix, &keyword_map, &valid_prefixes).await,
            Commands::Status { json } => show_status(json).await,
            Commands::Letter {
                directory,
                organization,
                location,
                recipient,
                opening,
                content,
            } => {
                generate_letter(directory, organization, location, recipient, opening, content)
                    .await
            }
            Commands::Config => show_config(),
        }
    }
}

/// Assemble one section fragment
async fn build_section(
    category: &str,
    tags: Vec<String>,
    exclude_tags: Vec<String>,
    max_items: Option<i64>,
    include_header: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    // Reject a malformed limit before touching any store
    let max_items = match max_items {
        Some(n) if n < 0 => {
            return Err(EngineError::InvalidFilter(format!(
                "max-items must not be negative (got {})",
                n
            ))
            .into());
        }
        Some(n) => Some(n as usize),
        None => None,
    };

    let spec = FilterSpec {
        category: category.to_string(),
        include_tags: tags.into_iter().collect(),
        exclude_tags: exclude_tags.into_iter().collect(),
        max_items,
    };
    spec.validate()?;

    let cfg = config::config()?;
    let metadata = MetadataStore::load(&cfg.metadata).await?;
    let content = ContentStore::new(&cfg.units);

    let units = select(&metadata, &spec)?;
    let fragment = assemble(&content, category, &units, include_header).await?;

    if fragment.is_empty() {
        eprintln!("Warning: no content generated for section '{}'", category);
    }

    match output {
        Some(dest) => {
            write_fragment(&fragment, &dest).await?;
            eprintln!("Section written to: {}", dest.display());
        }
        None => println!("{}", fragment),
    }

    Ok(())
}

/// Split a .bib file into per-label files
async fn split_bibliography(
    input: &PathBuf,
    out_dir: &PathBuf,
    prefix: &str,
    keyword_map: &PathBuf,
    valid_prefixes: &[String],
) -> Result<()> {
    let text = fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read bibliography: {}", input.display()))?;

    let map = KeywordMap::load(keyword_map).await?;

    let mut entries = bib::parse(&text)?;
    for entry in &mut entries {
        map.apply(entry, valid_prefixes);
    }

    let groups = bib::split(&entries, prefix);
    for (name, count) in bib::write_splits(&groups, out_dir).await? {
        println!("→ {} ({} entries)", name, count);
    }

    if bib::write_all(&entries, out_dir).await? {
        println!("→ all.bib ({} entries)", entries.len());
    }

    Ok(())
}

/// Machine-readable status report (also drives the human output)
#[derive(Debug, Serialize)]
struct StatusReport {
    total_units: usize,
    categories: BTreeMap<String, CategoryStatus>,
    sections: Vec<SectionFile>,
    integrity: Vec<IntegrityIssue>,
    top_tags: Vec<(String, usize)>,
}

#[derive(Debug, Serialize)]
struct CategoryStatus {
    units: usize,
    tags: BTreeSet<String>,
}

#[derive(Debug, Serialize)]
struct SectionFile {
    name: String,
    bytes: u64,
}

async fn collect_status() -> Result<StatusReport> {
    let cfg = config::config()?;
    let metadata = MetadataStore::load(&cfg.metadata).await?;
    let content = ContentStore::new(&cfg.units);

    let mut categories = BTreeMap::new();
    let mut tag_counts: BTreeMap<String, usize> = BTreeMap::new();

    for (category, units) in metadata.iter() {
        let mut tags = BTreeSet::new();
        for meta in units.values() {
            for tag in &meta.tags {
                tags.insert(tag.clone());
                *tag_counts.entry(tag.clone()).or_default() += 1;
            }
        }
        categories.insert(
            category.to_string(),
            CategoryStatus {
                units: units.len(),
                tags,
            },
        );
    }

    let mut sections = Vec::new();
    if cfg.sections.is_dir() {
        let mut dir = fs::read_dir(&cfg.sections).await?;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("tex") {
                let meta = entry.metadata().await?;
                sections.push(SectionFile {
                    name: entry.file_name().to_string_lossy().to_string(),
                    bytes: meta.len(),
                });
            }
        }
        sections.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let integrity = store::verify(&metadata, &content).await?;

    let mut top_tags: Vec<(String, usize)> = tag_counts.into_iter().collect();
    top_tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_tags.truncate(5);

    Ok(StatusReport {
        total_units: metadata.unit_count(),
        categories,
        sections,
        integrity,
        top_tags,
    })
}

/// Show library status and health
async fn show_status(json: bool) -> Result<()> {
    let report = collect_status().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("modcv status");
    println!("{}", "=".repeat(50));

    println!(
        "\nUnits: {} across {} categories",
        report.total_units,
        report.categories.len()
    );
    for (category, status) in &report.categories {
        println!("  {}: {} units", category, status.units);
        if !status.tags.is_empty() {
            let tags: Vec<&str> = status.tags.iter().map(String::as_str).collect();
            println!("    tags: {}", tags.join(", "));
        }
    }

    println!("\nGenerated sections:");
    if report.sections.is_empty() {
        println!("  none");
    }
    for section in &report.sections {
        println!("  {} ({})", section.name, human_size(section.bytes));
    }

    println!("\nHealth:");
    if report.integrity.is_empty() {
        println!("  metadata and unit files are consistent");
    }
    for issue in &report.integrity {
        println!("  {}", issue);
    }

    if !report.top_tags.is_empty() {
        println!("\nMost common tags:");
        for (tag, count) in &report.top_tags {
            println!("  {}: {} units", tag, count);
        }
    }

    Ok(())
}

fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB"] {
        if size < 1024.0 {
            return format!("{:.1}{}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1}GB", size)
}

/// Generate a cover letter template
async fn generate_letter(
    directory: PathBuf,
    organization: String,
    location: String,
    recipient: String,
    opening: String,
    content: Option<PathBuf>,
) -> Result<()> {
    let cfg = config::config()?;

    let mut spec = LetterSpec::new(organization, location);
    spec.recipient = recipient;
    spec.opening = opening;

    if let Some(path) = content {
        spec.body = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read letter content: {}", path.display()))?
            .trim()
            .to_string();
    }

    let letter_path = create_cover_letter(&directory, &cfg.letter_preamble, &spec).await?;
    println!("Cover letter created: {}", letter_path.display());
    println!(
        "To build: cd {} && latexmk -pdf -silent cover_letter.tex",
        directory.display()
    );

    Ok(())
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("root:            {}", cfg.root.display());
    println!("metadata:        {}", cfg.metadata.display());
    println!("units:           {}", cfg.units.display());
    println!("sections:        {}", cfg.sections.display());
    println!("letter preamble: {}", cfg.letter_preamble.display());
    match &cfg.config_file {
        Some(path) => println!("config file:     {}", path.display()),
        None => println!("config file:     (none found)"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512.0B");
        assert_eq!(human_size(2048), "2.0KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0MB");
    }

    #[test]
    fn test_cli_parses_section_command() {
        let cli = Cli::try_parse_from([
            "modcv",
            "section",
            "experience",
            "--tags",
            "full_cv",
            "academic",
            "--max-items",
            "3",
            "--include-header",
        ])
        .unwrap();

        match cli.command {
            Commands::Section {
                category,
                tags,
                max_items,
                include_header,
                ..
            } => {
                assert_eq!(category, "experience");
                assert_eq!(tags, vec!["full_cv", "academic"]);
                assert_eq!(max_items, Some(3));
                assert!(include_header);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_bib_defaults() {
        let cli = Cli::try_parse_from(["modcv", "bib", "cv.bib", "out"]).unwrap();

        match cli.command {
            Commands::Bib {
                prefix,
                valid_prefixes,
                ..
            } => {
                assert_eq!(prefix, "pub:");
                assert_eq!(valid_prefixes, vec!["pub:", "topic:", "meta:"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
