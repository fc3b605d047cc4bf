//! Layered settings: built-in defaults, then `stickerdl.toml`, then
//! `STICKERDL_*` environment variables.

use ::config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::Result;

const CONFIG_FILE: &str = "stickerdl";
const ENV_PREFIX: &str = "STICKERDL";

/// All settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mirror: MirrorSettings,
    pub catalog: CatalogSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Load settings from the working directory and environment
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(env_source())
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// `STICKERDL_<SECTION>__<KEY>` variables, e.g. `STICKERDL_MIRROR__DELAY_MS`
fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Tree mirror settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MirrorSettings {
    /// Directory-contents endpoint of the listing API
    pub listing_url: String,
    /// Base URL for raw file content
    pub raw_base_url: String,
    /// Prefix stripped from reported entry paths
    pub path_prefix: String,
    pub download_dir: PathBuf,
    pub extension: String,
    /// Pause after each attempted download, in milliseconds
    pub delay_ms: u64,
    /// Deepest directory level that is still listed (root is 0)
    pub max_depth: usize,
    /// Count all assets before downloading, to report `[n/total]` progress.
    /// Lists every directory twice.
    pub count_first: bool,
    pub user_agent: String,
}

impl MirrorSettings {
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for MirrorSettings {
    fn default() -> Self {
        Self {
            listing_url: "https://api.github.com/repos/ByMykel/counter-strike-image-tracker/contents/static/panorama/images/econ/stickers".to_string(),
            raw_base_url: "https://raw.githubusercontent.com/ByMykel/counter-strike-image-tracker/main/static/panorama/images/econ/stickers".to_string(),
            path_prefix: "static/panorama/images/econ/stickers/".to_string(),
            download_dir: PathBuf::from("cs2_stickers"),
            extension: ".png".to_string(),
            delay_ms: 100,
            max_depth: 64,
            count_first: false,
            user_agent: "CS2-Stickers-Downloader/1.0".to_string(),
        }
    }
}

/// Catalog organizer settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub catalog_url: String,
    pub download_dir: PathBuf,
    /// Literal prefix removed from display names
    pub name_prefix: String,
    pub extension: String,
    /// Pause after each successful download, in milliseconds
    pub delay_ms: u64,
    pub user_agent: String,
}

impl CatalogSettings {
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            catalog_url:
                "https://raw.githubusercontent.com/ByMykel/CSGO-API/main/public/api/en/stickers.json"
                    .to_string(),
            download_dir: PathBuf::from("cs2_stickers_api"),
            name_prefix: "Sticker | ".to_string(),
            extension: ".png".to_string(),
            delay_ms: 100,
            user_agent: "CS2-Stickers-API-Downloader/1.0".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
