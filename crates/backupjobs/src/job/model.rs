use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;
use crate::job::notification::{NotificationLevel, NotifyTarget};
use crate::script::manager::{DeletionPlan, ScriptFileManager};
use crate::script::slot::{ScriptSlot, SlotState};
use crate::script::upload::ScriptUpload;

/// The client machine a job backs up, as supplied by the surrounding
/// application. Only the fields this crate reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: u32,
    /// Remote location prefix, e.g. `user@host`. Empty/absent for local
    /// clients.
    pub url: Option<String>,
}

/// Include/exclude lists of the policy a job is attached to. Jobs fall back
/// to these when their own lists are unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyRef {
    pub include: Option<String>,
    pub exclude: Option<String>,
}

/// A backup job's configuration: what to back up, for which client, who to
/// notify, and the two optional pre/post script slots.
///
/// This is plain data handed over by the surrounding application; scheduling
/// and execution live elsewhere. The script slots are synchronized with disk
/// through [`ScriptFileManager`] at commit and deletion time.
#[derive(Debug)]
pub struct JobConfig {
    pub id: u32,
    pub client: ClientRef,
    pub name: String,
    pub description: Option<String>,
    /// Path on the client to back up.
    pub path: String,
    pub is_active: bool,
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub policy: Option<PolicyRef>,
    /// Username of the owning user, if any.
    pub owner: Option<String>,
    pub notify_targets: Vec<NotifyTarget>,
    pub notifications_email: Option<String>,
    pub min_notification_level: NotificationLevel,
    /// Disk usage of the job's backups, in KB.
    pub disk_usage_kb: u64,
    pub use_local_permissions: bool,
    pre: SlotState,
    post: SlotState,
}

impl JobConfig {
    pub fn new(id: u32, client: ClientRef, name: impl Into<String>, path: impl Into<String>) -> Self {
        JobConfig {
            id,
            client,
            name: name.into(),
            description: None,
            path: path.into(),
            is_active: true,
            include: None,
            exclude: None,
            policy: None,
            owner: None,
            notify_targets: vec![NotifyTarget::Owner],
            notifications_email: None,
            min_notification_level: NotificationLevel::default(),
            disk_usage_kb: 0,
            use_local_permissions: true,
            pre: SlotState::default(),
            post: SlotState::default(),
        }
    }

    /// Effective include list: the job's own when set and non-empty,
    /// otherwise the policy's.
    pub fn effective_include(&self) -> Option<&str> {
        non_empty(self.include.as_deref())
            .or_else(|| self.policy.as_ref().and_then(|p| non_empty(p.include.as_deref())))
    }

    /// Effective exclude list, with the same policy fallback.
    pub fn effective_exclude(&self) -> Option<&str> {
        non_empty(self.exclude.as_deref())
            .or_else(|| self.policy.as_ref().and_then(|p| non_empty(p.exclude.as_deref())))
    }

    /// Where the backup source lives: `client_url:path` for remote clients,
    /// the bare path for local ones.
    pub fn url(&self) -> String {
        match non_empty(self.client.url.as_deref()) {
            Some(url) => format!("{}:{}", url, self.path),
            None => self.path.clone(),
        }
    }

    /// Root of this job's snapshot tree under `base`, using the same
    /// zero-padded id convention as the script files.
    pub fn snapshot_root(&self, base: &Path) -> PathBuf {
        base.join(format!("{:04}", self.client.id))
            .join(format!("{:04}", self.id))
    }

    /// Stored (JSON) form of the notification target list.
    pub fn notify_targets_stored(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.notify_targets)
    }

    /// Restores the notification target list from its stored form.
    pub fn set_notify_targets_from_stored(&mut self, stored: &str) -> serde_json::Result<()> {
        self.notify_targets = serde_json::from_str(stored)?;
        Ok(())
    }

    pub fn slot(&self, slot: ScriptSlot) -> &SlotState {
        match slot {
            ScriptSlot::Pre => &self.pre,
            ScriptSlot::Post => &self.post,
        }
    }

    pub fn slot_mut(&mut self, slot: ScriptSlot) -> &mut SlotState {
        match slot {
            ScriptSlot::Pre => &mut self.pre,
            ScriptSlot::Post => &mut self.post,
        }
    }

    pub fn script_label(&self, slot: ScriptSlot) -> Option<&str> {
        self.slot(slot).label()
    }

    /// Attaches a newly submitted script to a slot; it is committed to disk
    /// by the next [`apply_commit`](Self::apply_commit).
    pub fn attach_script(&mut self, slot: ScriptSlot, upload: ScriptUpload) {
        self.slot_mut(slot).attach(upload);
    }

    /// Drops a slot's script; the on-disk file is removed at the next commit.
    pub fn clear_script(&mut self, slot: ScriptSlot) {
        self.slot_mut(slot).clear();
    }

    /// Decides both slots' filesystem transitions. Must run before the job
    /// record is written and before [`apply_commit`](Self::apply_commit).
    pub fn prepare_commit(&mut self) {
        self.pre.prepare_commit();
        self.post.prepare_commit();
    }

    /// Applies both slots' transitions, "pre" first. A failure on "post"
    /// leaves "pre" committed; the caller must surface the error and abort
    /// the surrounding save.
    pub fn apply_commit(&mut self, manager: &ScriptFileManager) -> Result<(), ScriptError> {
        let (client_id, job_id) = (self.client.id, self.id);
        for slot in ScriptSlot::ALL {
            manager.apply_commit(self.slot_mut(slot), client_id, job_id, slot)?;
        }
        Ok(())
    }

    /// Captures both slot paths before this job's record is removed.
    pub fn prepare_deletion(&self, manager: &ScriptFileManager) -> DeletionPlan {
        manager.prepare_deletion(self.client.id, self.id)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
