//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reelmark_api::DEFAULT_GENRE_ITEMS;
use reelmark_store::SearchSettings;
use reelmark_store::genres::DEFAULT_GRID_SIZE;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Search dropdown settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Genre grid settings.
    #[serde(default)]
    pub genres: GenresConfig,
}

/// TMDB settings. Credentials come from the environment, never the file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// Response language tag.
    #[serde(default = "default_language")]
    pub language: String,
    /// API base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Image CDN base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            base_url: None,
            image_base_url: None,
        }
    }
}

fn default_language() -> String {
    String::from("en-US")
}

/// Search settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    /// Debounce delay in milliseconds.
    pub debounce_ms: u64,
    /// Shortest query that triggers a fetch.
    pub min_query_len: usize,
    /// Results shown per query.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let settings = SearchSettings::default();
        Self {
            debounce_ms: u64::try_from(settings.debounce.as_millis()).unwrap_or(u64::MAX),
            min_query_len: settings.min_query_len,
            max_results: settings.max_results,
        }
    }
}

impl SearchConfig {
    /// Converts to store settings.
    #[must_use]
    pub const fn settings(&self) -> SearchSettings {
        SearchSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            min_query_len: self.min_query_len,
            max_results: self.max_results,
        }
    }
}

/// Genre grid settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenresConfig {
    /// Items fetched per genre before filtering.
    pub items_to_fetch: usize,
    /// Items kept in the grid.
    pub grid_size: usize,
}

impl Default for GenresConfig {
    fn default() -> Self {
        Self {
            items_to_fetch: DEFAULT_GENRE_ITEMS,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Renders the config as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config to TOML")
    }
}
