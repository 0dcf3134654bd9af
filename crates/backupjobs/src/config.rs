use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Filesystem roots injected by the surrounding application: where uploaded
/// job scripts are installed and where snapshot trees live.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub upload_dir: PathBuf,
    pub snapshot_root: PathBuf,
}

pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_settings_from_str(&content)
}

pub fn load_settings_from_str(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = serde_json::from_str(content)?;

    validate_settings(&settings)?;

    Ok(settings)
}

fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.upload_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            message: "upload_dir must not be empty".to_string(),
        });
    }
    if !settings.upload_dir.is_absolute() {
        return Err(ConfigError::Validation {
            message: format!(
                "upload_dir must be an absolute path, got '{}'",
                settings.upload_dir.display()
            ),
        });
    }
    if settings.snapshot_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            message: "snapshot_root must not be empty".to_string(),
        });
    }

    Ok(())
}
