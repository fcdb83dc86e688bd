//! # Settings Loader / 配置加载器
//!
//! Reads `settings.toml` into [`Settings`]. A missing file is not an error:
//! every section has defaults, so a fresh install runs with the native
//! dialog and stdout logging.
//!
//! 缺失的配置文件不是错误，使用默认值。

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use fsa_core::settings::Settings;
use fsa_platform::app_dirs::DirsAppDirsAdapter;

/// Environment variable that overrides the settings file location.
pub const CONFIG_ENV_VAR: &str = "FILE_SAVE_CONFIG";

/// Loads settings from one TOML file.
pub struct FileSettingsLoader {
    path: PathBuf,
}

impl FileSettingsLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loader for the default location.
    ///
    /// `FILE_SAVE_CONFIG` wins over `<config_dir>/file-save/settings.toml`.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Ok(Self::new(path));
            }
        }
        let app_dirs = DirsAppDirsAdapter::new()
            .get_app_dirs()
            .context("Failed to resolve application directories")?;
        Ok(Self::new(app_dirs.settings_path()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Errors / 错误
    ///
    /// Returns error if the file exists but cannot be read, or if its content
    /// is not valid TOML for [`Settings`].
    pub fn load(&self) -> anyhow::Result<Settings> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Settings file not found, using defaults");
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file: {}", self.path.display()))?;
        let settings = toml::from_str(&content).with_context(|| {
            format!("Failed to parse settings file: {}", self.path.display())
        })?;
        Ok(settings)
    }
}

/// Loads settings from `explicit` if given, otherwise from the default
/// location.
pub fn load_settings(explicit: Option<PathBuf>) -> anyhow::Result<Settings> {
    let loader = match explicit {
        Some(path) => FileSettingsLoader::new(path),
        None => FileSettingsLoader::from_env()?,
    };
    loader.load()
}
