use std::fmt;

use serde::{Deserialize, Serialize};

use crate::script::upload::ScriptUpload;

/// One of the two script roles a job can carry. The string form is part of
/// the on-disk naming contract and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptSlot {
    Pre,
    Post,
}

impl ScriptSlot {
    pub const ALL: [ScriptSlot; 2] = [ScriptSlot::Pre, ScriptSlot::Post];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptSlot::Pre => "pre",
            ScriptSlot::Post => "post",
        }
    }
}

impl fmt::Display for ScriptSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracked state for one script slot of a job.
///
/// `label` is the stored display name of the committed script, populated
/// from the uploaded file's original name. `pending` is a newly attached
/// upload not yet committed to disk. The reachable states are:
///
/// - empty: no label, no pending upload
/// - committed: label set, nothing pending
/// - pending-replace: label set (or about to be), upload attached
/// - pending-delete: label cleared, `prepare_commit` raises the delete flag
#[derive(Debug, Default)]
pub struct SlotState {
    label: Option<String>,
    pub(crate) pending: Option<ScriptUpload>,
    delete_existing: bool,
}

impl SlotState {
    /// A slot whose script was committed in an earlier transaction.
    pub fn committed(label: impl Into<String>) -> Self {
        SlotState {
            label: Some(label.into()),
            pending: None,
            delete_existing: false,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn delete_existing(&self) -> bool {
        self.delete_existing
    }

    /// Attaches a newly submitted file. The previous on-disk script, if any,
    /// is replaced at the next commit.
    pub fn attach(&mut self, upload: ScriptUpload) {
        self.pending = Some(upload);
    }

    /// Drops the script from this slot: the label is cleared and the on-disk
    /// file is removed at the next commit.
    pub fn clear(&mut self) {
        self.label = None;
        self.pending = None;
    }

    /// Decides the filesystem transition for this slot. Pure and idempotent;
    /// must run before any disk mutation so the decision is based on
    /// pre-mutation state.
    ///
    /// The existing file is scheduled for deletion when the slot has no
    /// stored label (nothing was ever committed, or the script was dropped)
    /// or when a new upload replaces it. A pending upload also stamps its
    /// original name into the label.
    pub fn prepare_commit(&mut self) {
        self.delete_existing = self.label.is_none() || self.pending.is_some();
        if let Some(upload) = &self.pending {
            self.label = Some(upload.original_name().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn upload(name: &str) -> ScriptUpload {
        ScriptUpload::new(name, PathBuf::from("/tmp/upload-stage/abc123"))
    }

    #[test]
    fn test_slot_as_str() {
        assert_eq!(ScriptSlot::Pre.as_str(), "pre");
        assert_eq!(ScriptSlot::Post.as_str(), "post");
        assert_eq!(ScriptSlot::Pre.to_string(), "pre");
    }

    #[test]
    fn test_prepare_empty_slot_no_upload() {
        // No prior script, nothing attached: nothing on disk to delete and
        // the label stays unset.
        let mut slot = SlotState::default();
        slot.prepare_commit();
        assert!(slot.delete_existing());
        assert!(slot.label().is_none());
        assert!(!slot.has_pending());
    }

    #[test]
    fn test_prepare_committed_slot_unchanged() {
        let mut slot = SlotState::committed("setup.sh");
        slot.prepare_commit();
        assert!(!slot.delete_existing());
        assert_eq!(slot.label(), Some("setup.sh"));
    }

    #[test]
    fn test_prepare_replacement_upload() {
        let mut slot = SlotState::committed("old.sh");
        slot.attach(upload("new.sh"));
        slot.prepare_commit();
        assert!(slot.delete_existing());
        assert_eq!(slot.label(), Some("new.sh"));
    }

    #[test]
    fn test_prepare_first_upload() {
        let mut slot = SlotState::default();
        slot.attach(upload("setup.sh"));
        slot.prepare_commit();
        assert!(slot.delete_existing());
        assert_eq!(slot.label(), Some("setup.sh"));
    }

    #[test]
    fn test_prepare_after_clear() {
        let mut slot = SlotState::committed("old.sh");
        slot.clear();
        slot.prepare_commit();
        assert!(slot.delete_existing());
        assert!(slot.label().is_none());
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let mut slot = SlotState::committed("old.sh");
        slot.attach(upload("new.sh"));
        slot.prepare_commit();
        let first = (slot.delete_existing(), slot.label().map(String::from));
        slot.prepare_commit();
        let second = (slot.delete_existing(), slot.label().map(String::from));
        assert_eq!(first, second);
    }
}
