//! `sitegov.toml`.
//!
//! Every section is optional and falls back to the production defaults.
//! Dates are quoted strings (`"2025-01-10"`); TOML date literals are not
//! accepted. Data paths are resolved against the config file's directory.

use crate::error::StoreError;
use crate::overlap::load_overlap_store;
use crate::signals::load_page_signals;
use serde::{Deserialize, Serialize};
use sitegov_kernel::monitor::DEFAULT_CAPACITY;
use sitegov_kernel::{OverlapStore, PageSignals, PolicyTable, RouteDescriptor, SlugRegistry};
use sitegov_sitemap::{LastmodTable, SiteCatalog};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://www.webvello.com";
pub const DEFAULT_CONFIG_FILE: &str = "sitegov.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// JSON object of overlap records keyed by hub path.
    pub overlap: Option<PathBuf>,
    /// JSONL uniqueness block records.
    pub blocks: Option<PathBuf>,
    /// JSON object of page signals keyed by site path.
    pub signals: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    pub base_url: String,
    pub registry: SlugRegistry,
    pub policy: PolicyTable,
    pub lastmod: LastmodTable,
    pub catalog: SiteCatalog,
    pub monitor: MonitorConfig,
    pub data: DataPaths,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            registry: SlugRegistry::default(),
            policy: PolicyTable::default(),
            lastmod: LastmodTable::default(),
            catalog: SiteCatalog::default(),
            monitor: MonitorConfig::default(),
            data: DataPaths::default(),
        }
    }
}

impl GovernanceConfig {
    /// Parse and validate. Relative data paths are left as written.
    pub fn from_toml_str(path: &Path, raw: &str) -> Result<Self, StoreError> {
        let config: Self = toml::from_str(raw).map_err(|e| StoreError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.policy.validate()?;
        if !config.base_url.starts_with("https://") {
            return Err(StoreError::Config {
                path: path.display().to_string(),
                message: format!("base_url must be an https URL, got `{}`", config.base_url),
            });
        }
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        let mut config = Self::from_toml_str(path, &raw)?;
        let root = path.parent().unwrap_or_else(|| Path::new(""));
        config.data.overlap = config.data.overlap.map(|p| root.join(p));
        config.data.blocks = config.data.blocks.map(|p| root.join(p));
        config.data.signals = config.data.signals.map(|p| root.join(p));
        debug!(
            path = %path.display(),
            cities = config.registry.cities().count(),
            "loaded governance config"
        );
        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// The configured overlap store, or an empty one when no file is set.
    pub fn overlap_store(&self) -> Result<OverlapStore, StoreError> {
        match &self.data.overlap {
            Some(path) => load_overlap_store(path),
            None => Ok(OverlapStore::default()),
        }
    }

    /// Configured page signals; empty when no file is set.
    pub fn page_signals(&self) -> Result<HashMap<RouteDescriptor, PageSignals>, StoreError> {
        match &self.data.signals {
            Some(path) => load_page_signals(path),
            None => Ok(HashMap::new()),
        }
    }
}
