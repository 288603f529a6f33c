use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::{LoadOptions, DEFAULT_SHEET};
use crate::data::normalize::{default_synonyms, ColumnNames, NormalizeOptions, SynonymTable};

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "ROSTER_CONFIG";

/// Config file looked up in the working directory when `ROSTER_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "roster.json";

pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/gibsona83/MILVroster/main/MILV%20-%20Provider%20Worksheet.xlsx";

/// Viewer configuration. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Remote worksheet fetched at startup. `None` starts with the upload prompt.
    pub source_url: Option<String>,
    /// Workbook sheet holding the roster.
    pub sheet_name: String,
    /// How long a fetched remote source is reused before refetching.
    pub cache_ttl_secs: u64,
    /// Whole-request timeout for the remote fetch.
    pub request_timeout_secs: u64,
    /// Header names of the interpreted columns.
    pub columns: ColumnNames,
    /// Subspecialty spellings mapped to their canonical form before splitting.
    pub synonyms: SynonymTable,
    /// Logo shown above the filters when the file exists.
    pub logo_path: PathBuf,
    /// Window and page title.
    pub title: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            source_url: Some(DEFAULT_SOURCE_URL.to_string()),
            sheet_name: DEFAULT_SHEET.to_string(),
            cache_ttl_secs: 600,
            request_timeout_secs: 30,
            columns: ColumnNames::default(),
            synonyms: default_synonyms(),
            logo_path: PathBuf::from("milv.png"),
            title: "MILV Physician Roster".to_string(),
        }
    }
}

impl RosterConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            sheet_name: self.sheet_name.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            columns: self.columns.clone(),
            synonyms: self.synonyms.clone(),
        }
    }
}

/// `ROSTER_CONFIG` if set, otherwise `roster.json` in the working directory.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Read config from `path`. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<RosterConfig> {
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(RosterConfig::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let cfg: RosterConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    log::info!("Loaded config from {}", path.display());
    Ok(cfg)
}

/// Config for the running process. A broken file is logged and replaced by
/// the defaults so the window can still open.
pub fn load_or_default() -> RosterConfig {
    let path = config_path();
    match load_config_from(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("Ignoring config: {e:#}");
            RosterConfig::default()
        }
    }
}
