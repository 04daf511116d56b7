use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Display preferences for the inspection surface. Persisted alongside the
/// engine settings so one file round-trips the whole panel state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Surround field values with quotes.
    pub show_quotes: bool,
    /// Raw keys to visually highlight when present.
    pub highlight_keys: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_quotes: true,
            highlight_keys: ["pageName", "ch", "events", "products"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Global configuration loaded from `~/.config/tagscope/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagscopeConfig {
    /// Provider names to enable, in dispatch priority order. Empty means
    /// every known provider.
    #[serde(default)]
    pub enabled_providers: Vec<String>,
    /// Optional display preferences; defaults are used when missing.
    #[serde(default)]
    pub display: DisplayConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tagscope")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TagscopeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TagscopeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: TagscopeConfig = toml::from_str(&data)?;
    Ok(cfg)
}
