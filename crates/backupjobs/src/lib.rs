pub mod config;
pub mod error;
pub mod job;
pub mod script;

pub use config::{load_settings, Settings};
pub use error::{BackupJobsError, ConfigError, Result, ScriptError};
pub use job::{ClientRef, JobConfig, NotificationLevel, NotifyTarget, PolicyRef};
pub use script::{DeletionPlan, ScriptFileManager, ScriptSlot, ScriptUpload, SlotState};
