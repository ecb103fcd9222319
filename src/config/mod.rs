pub mod settings;

// Re-export commonly used types
pub use settings::{
    ApiSettings, AssetSettings, SettingsError, SettingsResult, ViewerSettings,
    load_settings_from, save_settings, save_settings_to, settings_path,
};
