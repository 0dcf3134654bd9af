use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupJobsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Script file error: {0}")]
    Script(#[from] ScriptError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Settings validation failed: {message}")]
    Validation { message: String },
}

/// Filesystem failures while synchronizing a job's script files. All of
/// these are fatal for the current commit or deletion sequence; nothing is
/// caught or retried locally, and steps already applied are not rolled back.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove script file '{path}': {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move script from '{from}' to '{to}': {source}")]
    MoveFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to set permissions on '{path}': {source}")]
    SetPermissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove '{path}': {source}")]
    RemoveTree {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BackupJobsError>;
