use std::path::{Path, PathBuf};

use crate::error::ScriptError;

/// A newly submitted script file sitting at a staging location, not yet
/// committed to the upload directory. `original_name` is the name the file
/// had on the submitter's side and becomes the slot's stored label.
#[derive(Debug)]
pub struct ScriptUpload {
    original_name: String,
    temp_path: PathBuf,
}

impl ScriptUpload {
    pub fn new(original_name: impl Into<String>, temp_path: impl Into<PathBuf>) -> Self {
        ScriptUpload {
            original_name: original_name.into(),
            temp_path: temp_path.into(),
        }
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Moves the staged file into `directory` under `filename`. Uses `rename`
    /// first (fast, atomic on the same filesystem) and falls back to
    /// copy + delete when rename fails, which handles cross-device moves.
    pub(crate) fn move_to(&self, directory: &Path, filename: &str) -> Result<PathBuf, ScriptError> {
        let dst = directory.join(filename);

        if std::fs::rename(&self.temp_path, &dst).is_ok() {
            return Ok(dst);
        }

        std::fs::copy(&self.temp_path, &dst).map_err(|e| ScriptError::MoveFile {
            from: self.temp_path.clone(),
            to: dst.clone(),
            source: e,
        })?;
        std::fs::remove_file(&self.temp_path).map_err(|e| ScriptError::MoveFile {
            from: self.temp_path.clone(),
            to: dst.clone(),
            source: e,
        })?;
        Ok(dst)
    }
}
