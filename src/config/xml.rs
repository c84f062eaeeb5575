//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - A missing file means "all defaults"; a malformed one is an error.
//!
//! Notes:
//! - Unknown XML fields are rejected to surface misconfigurations early.
//! - Empty elements are treated as unset.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::config_path;
use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "backup_dir")]
    backup_dir: Option<String>,
    #[serde(rename = "tmp_dir")]
    tmp_dir: Option<String>,
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
}

fn non_empty_path(s: Option<&str>) -> Option<PathBuf> {
    s.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(PathBuf::from)
}

fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let log_level = match parsed.log_level.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.parse::<LogLevel>().map_err(anyhow::Error::msg)?,
        _ => LogLevel::default(),
    };
    Ok(Config {
        backup_dir: non_empty_path(parsed.backup_dir.as_deref()),
        tmp_dir: non_empty_path(parsed.tmp_dir.as_deref()),
        log_level,
        log_file: non_empty_path(parsed.log_file.as_deref()),
    })
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in config xml '{}'", path.display()))
}

/// Load the effective Config: `$DIRSYNC_CONFIG` or the default location, defaults when absent.
pub fn load() -> Result<Config> {
    let Some(path) = config_path() else {
        debug!("no config location could be determined; using defaults");
        return Ok(Config::default());
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(Config::default());
    }
    debug!(path = %path.display(), "loading config");
    load_config_from_xml_path(&path)
}
