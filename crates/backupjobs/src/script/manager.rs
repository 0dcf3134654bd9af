use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::ScriptError;
use crate::script::slot::{ScriptSlot, SlotState};

/// Keeps a job's on-disk pre/post scripts in sync with its stored labels.
///
/// The surrounding save/delete transaction drives the phases explicitly:
/// [`SlotState::prepare_commit`] before any disk mutation, [`apply_commit`]
/// after the record is persisted, and [`prepare_deletion`]/[`apply_deletion`]
/// around record removal. All filesystem calls are blocking and run in-line;
/// any failure is fatal for the remainder of the current sequence and must
/// abort the surrounding transaction.
///
/// The caller is responsible for serializing commits per job id. Concurrent
/// commits to the same job race on the deterministic path and are not
/// detected (last writer wins).
///
/// [`apply_commit`]: ScriptFileManager::apply_commit
/// [`prepare_deletion`]: ScriptFileManager::prepare_deletion
/// [`apply_deletion`]: ScriptFileManager::apply_deletion
pub struct ScriptFileManager {
    upload_dir: PathBuf,
}

/// Slot file paths captured before a job record is removed. The paths depend
/// on the job id, which may no longer be resolvable once the record is gone.
#[derive(Debug)]
pub struct DeletionPlan {
    paths: Vec<PathBuf>,
}

impl DeletionPlan {
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl ScriptFileManager {
    pub fn new<P: AsRef<Path>>(upload_dir: P) -> Self {
        ScriptFileManager {
            upload_dir: upload_dir.as_ref().to_path_buf(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// File name for (client, job, slot): `{client:04}_{job:04}.{slot}`.
    /// Stable external contract; tooling reads scripts by this exact name.
    pub fn script_name(client_id: u32, job_id: u32, slot: ScriptSlot) -> String {
        format!("{:04}_{:04}.{}", client_id, job_id, slot.as_str())
    }

    /// Deterministic on-disk location of a slot's script.
    pub fn script_path(&self, client_id: u32, job_id: u32, slot: ScriptSlot) -> PathBuf {
        self.upload_dir
            .join(Self::script_name(client_id, job_id, slot))
    }

    /// Applies the transition decided by [`SlotState::prepare_commit`] for
    /// one slot, in order: remove the existing file when the slot was marked
    /// for deletion, then move a pending upload into place and mark it
    /// executable (0755). The pending upload is consumed only after a
    /// successful move, so a later unrelated commit does not re-apply it.
    ///
    /// Commits are not transactional across the two slots: if "pre" succeeds
    /// and "post" fails, "pre" stays committed. Known limitation.
    pub fn apply_commit(
        &self,
        state: &mut SlotState,
        client_id: u32,
        job_id: u32,
        slot: ScriptSlot,
    ) -> Result<(), ScriptError> {
        let path = self.script_path(client_id, job_id, slot);

        if state.delete_existing() && path.exists() {
            std::fs::remove_file(&path).map_err(|e| ScriptError::RemoveFile {
                path: path.clone(),
                source: e,
            })?;
            info!("removed {} script for job {}: {:?}", slot, job_id, path);
        }

        if let Some(upload) = &state.pending {
            self.ensure_upload_dir()?;
            let moved = upload.move_to(&self.upload_dir, &Self::script_name(client_id, job_id, slot))?;
            set_executable(&moved)?;
            info!(
                "installed {} script '{}' for job {} at {:?}",
                slot,
                upload.original_name(),
                job_id,
                moved
            );
            // One-shot consumption, strictly after the move succeeded.
            state.pending = None;
        }

        Ok(())
    }

    /// Captures both slot paths ahead of the job record's removal.
    pub fn prepare_deletion(&self, client_id: u32, job_id: u32) -> DeletionPlan {
        DeletionPlan {
            paths: ScriptSlot::ALL
                .iter()
                .map(|slot| self.script_path(client_id, job_id, *slot))
                .collect(),
        }
    }

    /// Removes every captured path that still exists. A missing path is a
    /// no-op; a path that turned into a directory tree is removed
    /// recursively. The first failure aborts the remaining removals.
    pub fn apply_deletion(&self, plan: &DeletionPlan) -> Result<(), ScriptError> {
        for path in plan.paths() {
            let meta = match std::fs::symlink_metadata(path) {
                Ok(meta) => meta,
                Err(_) => continue,
            };
            let result = if meta.is_dir() {
                std::fs::remove_dir_all(path)
            } else {
                std::fs::remove_file(path)
            };
            result.map_err(|e| ScriptError::RemoveTree {
                path: path.clone(),
                source: e,
            })?;
            debug!("removed script path {:?}", path);
        }
        Ok(())
    }

    fn ensure_upload_dir(&self) -> Result<(), ScriptError> {
        if !self.upload_dir.exists() {
            std::fs::create_dir_all(&self.upload_dir).map_err(|e| {
                ScriptError::CreateDirectory {
                    path: self.upload_dir.clone(),
                    source: e,
                }
            })?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), ScriptError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|e| {
        ScriptError::SetPermissions {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), ScriptError> {
    Ok(())
}
