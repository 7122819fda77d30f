use std::path::PathBuf;

use digiclock_skin::{ClassicSkin, TextEngine};
use digiclock_types::AppConfig;

/// Application name used for the configuration directory
pub const APP_NAME: &str = "digiclock";
const CONFIG_NAME: &str = "config";

/// Persisted configuration plus the helpers the commands share
#[derive(Debug, Default)]
pub struct AppState {
    pub config: AppConfig,
}

impl AppState {
    /// Load the stored configuration, falling back to defaults when the file
    /// is missing or unreadable
    pub fn load() -> Self {
        let config = match confy::load(APP_NAME, CONFIG_NAME) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load configuration, using defaults");
                AppConfig::default()
            }
        };
        Self { config }
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn save(&self) -> Result<(), String> {
        confy::store(APP_NAME, CONFIG_NAME, &self.config).map_err(|e| e.to_string())
    }

    pub fn config_path() -> Result<PathBuf, String> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(|e| e.to_string())
    }

    /// Build a skin for the current configuration over the system fonts
    pub fn build_skin(&self) -> ClassicSkin {
        ClassicSkin::from_config(&self.config.skin, TextEngine::new())
    }
}
