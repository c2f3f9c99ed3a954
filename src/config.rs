use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Catalog connection settings. Read from `cinefeed.toml`, then env overrides.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
    /// Reviews are requested in their own language regardless of `language`.
    pub review_language: String,
    pub request_timeout_ms: u64,
    /// How close (in items) to the end of the list a scroll must get before the next page loads.
    pub scroll_lookahead: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            language: "ko".to_string(),
            review_language: "en".to_string(),
            request_timeout_ms: 15_000,
            scroll_lookahead: 3,
        }
    }
}

impl CatalogConfig {
    /// Load from an explicit file, or the platform config dir if a file exists there,
    /// then apply `CINEFEED_*` env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };
        let mut cfg = match file {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        if cfg.api_key.is_empty() {
            tracing::warn!("no catalog api key configured; requests will likely be rejected");
        }
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config: {}", path.display()))
    }

    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |k: &str| var(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(v) = set("CINEFEED_API_KEY") { self.api_key = v; }
        if let Some(v) = set("CINEFEED_LANGUAGE") { self.language = v; }
        if let Some(v) = set("CINEFEED_BASE_URL") { self.base_url = v; }
        if let Some(ms) = set("CINEFEED_TIMEOUT_MS").and_then(|v| v.parse().ok()) { self.request_timeout_ms = ms; }
    }

    pub fn timeout(&self) -> Duration { Duration::from_millis(self.request_timeout_ms.max(1)) }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "cinefeed", "cinefeed").map(|p| p.config_dir().join("cinefeed.toml"))
}
