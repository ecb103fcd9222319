use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "CLASH_VIEWER";
const ENV_SEPARATOR: &str = "__";

// =============================================================================
// Viewer Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the clash API; `{region}` is replaced by the region.
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://{region}.api.riotgames.com".to_string(),
            api_key: None,
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub enable_texture: bool,
    /// Maximum number of champion models kept after loading.
    pub cache_capacity: usize,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            enable_texture: true,
            cache_capacity: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub region: String,
    pub log_file: Option<PathBuf>,
    pub api: ApiSettings,
    pub assets: AssetSettings,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            region: "euw1".to_string(),
            log_file: Some(PathBuf::from("clash-viewer.log")),
            api: ApiSettings::default(),
            assets: AssetSettings::default(),
        }
    }
}

impl ViewerSettings {
    /// Defaults, overlaid with `path` when it exists, overlaid with
    /// `CLASH_VIEWER__*` environment variables
    /// (e.g. `CLASH_VIEWER__API__TIMEOUT_MS=2000`).
    pub fn layered(path: Option<&Path>) -> SettingsResult<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&ViewerSettings::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let settings: ViewerSettings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("No configuration directory available")]
    NoConfigDir,

    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Failed to decode settings: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("Failed to layer settings: {0}")]
    Layered(#[from] config::ConfigError),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

// Settings file management
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "clash", "clash-viewer")
        .map(|proj| proj.config_dir().join(CONFIG_FILE))
}

pub fn save_settings(settings: &ViewerSettings) -> SettingsResult<()> {
    let path = settings_path().ok_or(SettingsError::NoConfigDir)?;
    save_settings_to(settings, &path)
}

pub fn save_settings_to(settings: &ViewerSettings, path: &Path) -> SettingsResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let toml = toml::to_string_pretty(settings)?;
    fs::write(path, toml)?;
    tracing::debug!("Saved settings to {}", path.display());
    Ok(())
}

pub fn load_settings_from(path: &Path) -> SettingsResult<ViewerSettings> {
    let data = fs::read_to_string(path)?;
    Ok(toml::from_str(&data)?)
}
