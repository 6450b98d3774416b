//! Generator configuration.
//!
//! The effective config is layered: built-in defaults, then the slug the
//! problem declares, then an optional JSON config file, then command-line
//! flags.
use crate::verifier::SubtaskAttribution;
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_SLUG: &str = "problem";
pub const DEFAULT_TC_DIR: &str = "tc";
const SLUG_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_-]*$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub slug: String,
    pub seed: u64,
    /// Shell-style command line; `None` means outputs come from bindings.
    pub solution: Option<String>,
    pub tc_dir: PathBuf,
    pub attribution: SubtaskAttribution,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            slug: DEFAULT_SLUG.to_string(),
            seed: 0,
            solution: None,
            tc_dir: PathBuf::from(DEFAULT_TC_DIR),
            attribution: SubtaskAttribution::Lenient,
        }
    }
}

/// On-disk config (`--config <PATH>`); every field but the schema version is
/// optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tc_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_subtasks: Option<bool>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub slug: Option<String>,
    pub seed: Option<u64>,
    pub solution: Option<String>,
    pub tc_dir: Option<PathBuf>,
    pub strict_subtasks: bool,
}

pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: ConfigFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse generator config JSON {}", path.display()))?;
    validate_config_file(&config)?;
    Ok(config)
}

pub fn validate_config_file(config: &ConfigFile) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported generator config schema_version {}",
            config.schema_version
        ));
    }
    if let Some(solution) = config.solution.as_deref() {
        if solution.trim().is_empty() {
            return Err(anyhow!("solution must be non-empty when present"));
        }
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    let pattern = Regex::new(SLUG_PATTERN).context("compile slug pattern")?;
    if !pattern.is_match(slug) {
        return Err(anyhow!("Slug must match {SLUG_PATTERN} (got {slug:?})"));
    }
    Ok(())
}

/// Layer defaults, the declared slug, the config file, and the overrides.
pub fn resolve_config(
    declared_slug: Option<&str>,
    file: Option<&ConfigFile>,
    overrides: &ConfigOverrides,
) -> Result<GeneratorConfig> {
    let mut config = GeneratorConfig::default();
    if let Some(slug) = declared_slug {
        config.slug = slug.to_string();
    }
    if let Some(file) = file {
        if let Some(slug) = &file.slug {
            config.slug = slug.clone();
        }
        if let Some(seed) = file.seed {
            config.seed = seed;
        }
        if let Some(solution) = &file.solution {
            config.solution = Some(solution.clone());
        }
        if let Some(tc_dir) = &file.tc_dir {
            config.tc_dir = tc_dir.clone();
        }
        if let Some(strict) = file.strict_subtasks {
            config.attribution = if strict {
                SubtaskAttribution::Strict
            } else {
                SubtaskAttribution::Lenient
            };
        }
    }
    if let Some(slug) = &overrides.slug {
        config.slug = slug.clone();
    }
    if let Some(seed) = overrides.seed {
        config.seed = seed;
    }
    if let Some(solution) = &overrides.solution {
        config.solution = Some(solution.clone());
    }
    if let Some(tc_dir) = &overrides.tc_dir {
        config.tc_dir = tc_dir.clone();
    }
    if overrides.strict_subtasks {
        config.attribution = SubtaskAttribution::Strict;
    }
    validate_slug(&config.slug)?;
    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
