use std::path::PathBuf;

use anyhow::{anyhow, Result};

const APP_DIR_NAME: &str = "file-save";
const SETTINGS_FILE_NAME: &str = "settings.toml";
const LOGS_DIR_NAME: &str = "logs";

fn resolved_app_dir_name() -> String {
    match std::env::var("FILE_SAVE_PROFILE") {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

/// Per-user directories of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppDirs {
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE_NAME)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join(LOGS_DIR_NAME)
    }
}

pub struct DirsAppDirsAdapter {
    base_override: Option<PathBuf>,
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_override: None,
        }
    }

    /// Resolves every directory under `base` instead of the system locations.
    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            base_override: Some(base),
        }
    }

    pub fn get_app_dirs(&self) -> Result<AppDirs> {
        let name = resolved_app_dir_name();
        if let Some(base) = &self.base_override {
            return Ok(AppDirs {
                config_dir: base.join("config").join(&name),
                data_dir: base.join("data").join(&name),
            });
        }

        let config = dirs::config_dir().ok_or_else(|| anyhow!("config dir unavailable"))?;
        let data = dirs::data_local_dir().ok_or_else(|| anyhow!("data local dir unavailable"))?;
        Ok(AppDirs {
            config_dir: config.join(&name),
            data_dir: data.join(&name),
        })
    }
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}
