//! Configuration for modcv paths.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (MODCV_ROOT, MODCV_METADATA, MODCV_UNITS, MODCV_SECTIONS)
//! 2. Config file (.modcv/config.yaml)
//! 3. Defaults relative to the current directory
//!
//! Config file discovery:
//! - Searches current directory and parents for .modcv/config.yaml
//! - Paths in config file are relative to the config file's parent directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Unit metadata YAML file (relative to project root)
    pub metadata: Option<String>,
    /// Unit bodies directory (relative to project root)
    pub units: Option<String>,
    /// Assembled fragments directory (relative to project root)
    pub sections: Option<String>,
    /// Personal preamble spliced into generated cover letters
    pub letter_preamble: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Project root (parent of .modcv/, or the working directory)
    pub root: PathBuf,
    /// Unit metadata YAML file
    pub metadata: PathBuf,
    /// Unit bodies directory
    pub units: PathBuf,
    /// Assembled fragments directory
    pub sections: PathBuf,
    /// Cover letter preamble file
    pub letter_preamble: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Search a directory and its parents for .modcv/config.yaml
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(".modcv").join("config.yaml");
        if candidate.exists() {
            return Some(candidate);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project root
fn resolve_path(root: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

/// Load configuration starting discovery from the given directory
fn load_config_from(start: &Path) -> Result<ResolvedConfig> {
    let config_file = find_config_file(start);

    let (root, paths) = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // Project root is the parent of .modcv/
        let root = config_path
            .parent() // .modcv/
            .and_then(|p| p.parent()) // project root
            .unwrap_or(Path::new("."))
            .to_path_buf();

        (root, config.paths)
    } else {
        (start.to_path_buf(), PathsConfig::default())
    };

    let root = if let Ok(env_root) = std::env::var("MODCV_ROOT") {
        PathBuf::from(env_root)
    } else {
        root
    };

    let metadata = if let Ok(env_meta) = std::env::var("MODCV_METADATA") {
        PathBuf::from(env_meta)
    } else if let Some(ref rel) = paths.metadata {
        resolve_path(&root, rel)
    } else {
        root.join("unit_metadata.yaml")
    };

    let units = if let Ok(env_units) = std::env::var("MODCV_UNITS") {
        PathBuf::from(env_units)
    } else if let Some(ref rel) = paths.units {
        resolve_path(&root, rel)
    } else {
        root.join("units")
    };

    let sections = if let Ok(env_sections) = std::env::var("MODCV_SECTIONS") {
        PathBuf::from(env_sections)
    } else if let Some(ref rel) = paths.sections {
        resolve_path(&root, rel)
    } else {
        root.join("sections")
    };

    let letter_preamble = if let Some(ref rel) = paths.letter_preamble {
        resolve_path(&root, rel)
    } else {
        root.join("letter_preamble.tex")
    };

    Ok(ResolvedConfig {
        root,
        metadata,
        units,
        sections,
        letter_preamble,
        config_file,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    load_config_from(&cwd)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
