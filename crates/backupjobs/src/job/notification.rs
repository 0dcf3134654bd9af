use serde::{Deserialize, Serialize};

/// Where notifications about a job's runs are routed. The stored form is a
/// JSON-encoded list of the lowercase strings; see
/// [`JobConfig`](crate::job::JobConfig) for the encode/decode accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyTarget {
    Admin,
    Owner,
    Email,
}

/// Minimum severity at which a job sends notifications.
///
/// The numeric values are the stored representation and match the levels
/// found in historical job records, so they must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum NotificationLevel {
    All,
    Info,
    Warning,
    #[default]
    Error,
    None,
}

impl NotificationLevel {
    pub fn as_stored(self) -> i32 {
        match self {
            NotificationLevel::All => 0,
            NotificationLevel::Info => 200,
            NotificationLevel::Warning => 300,
            NotificationLevel::Error => 400,
            NotificationLevel::None => 1000,
        }
    }

    pub fn from_stored(value: i32) -> Option<Self> {
        match value {
            0 => Some(NotificationLevel::All),
            200 => Some(NotificationLevel::Info),
            300 => Some(NotificationLevel::Warning),
            400 => Some(NotificationLevel::Error),
            1000 => Some(NotificationLevel::None),
            _ => Option::None,
        }
    }

    /// Whether an event of severity `level` clears this threshold.
    pub fn covers(self, level: NotificationLevel) -> bool {
        self != NotificationLevel::None && level >= self
    }
}
