use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

/// Application configuration loaded from TOML config file.
/// All fields have defaults; the config file is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog feed (file or directory of pages) used when `--catalog` is omitted.
    pub catalog_path: Option<PathBuf>,
    /// Performance feed (file or directory of pages) used when `--setlists` is omitted.
    pub setlists_path: Option<PathBuf>,
    /// How many rows the text tables show.
    pub display: DisplayConfig,
}

/// Row limits for printed tables. Full tables are always computed.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows for ranked chart tables (countries, cities, songs).
    pub chart_rows: usize,
    /// Rows for first/last song tables.
    pub edge_rows: usize,
    /// Rows for the non-album song table.
    pub non_album_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            chart_rows: 30,
            edge_rows: 5,
            non_album_rows: 15,
        }
    }
}

impl AppConfig {
    /// Load config from `~/.config/setstats/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::parse(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Parse config from TOML text.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
