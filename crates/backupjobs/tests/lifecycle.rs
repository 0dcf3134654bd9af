//! End-to-end script lifecycle: save a job with uploads, replace a script,
//! drop one, and clean up after the job is deleted.

use std::path::Path;

use backupjobs::{ClientRef, JobConfig, ScriptFileManager, ScriptSlot, ScriptUpload};
use tempfile::TempDir;

fn stage(dir: &Path, name: &str, content: &[u8]) -> ScriptUpload {
    let staged = dir.join(name);
    std::fs::write(&staged, content).unwrap();
    ScriptUpload::new(name, staged)
}

#[test]
fn save_with_both_scripts_then_delete() {
    let uploads = TempDir::new().unwrap();
    let staging = TempDir::new().unwrap();
    let manager = ScriptFileManager::new(uploads.path());

    let mut job = JobConfig::new(7, ClientRef { id: 3, url: None }, "nightly", "/srv/data");
    job.attach_script(ScriptSlot::Pre, stage(staging.path(), "setup.sh", b"#!/bin/sh\n"));
    job.attach_script(
        ScriptSlot::Post,
        stage(staging.path(), "teardown.sh", b"#!/bin/sh\n"),
    );

    // Save: decide transitions, persist the record (elsewhere), apply.
    job.prepare_commit();
    assert_eq!(job.script_label(ScriptSlot::Pre), Some("setup.sh"));
    assert_eq!(job.script_label(ScriptSlot::Post), Some("teardown.sh"));
    job.apply_commit(&manager).unwrap();

    let pre = uploads.path().join("0003_0007.pre");
    let post = uploads.path().join("0003_0007.post");
    assert!(pre.exists());
    assert!(post.exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        assert_eq!(
            std::fs::metadata(&pre).unwrap().permissions().mode() & 0o777,
            0o755
        );
    }

    // Delete the job: paths are captured before the record goes away.
    let plan = job.prepare_deletion(&manager);
    drop(job);
    manager.apply_deletion(&plan).unwrap();
    assert!(!pre.exists());
    assert!(!post.exists());
}

#[test]
fn replace_and_drop_scripts_across_saves() {
    let uploads = TempDir::new().unwrap();
    let staging = TempDir::new().unwrap();
    let manager = ScriptFileManager::new(uploads.path());

    let mut job = JobConfig::new(7, ClientRef { id: 3, url: None }, "nightly", "/srv/data");
    job.attach_script(ScriptSlot::Pre, stage(staging.path(), "v1.sh", b"v1"));
    job.attach_script(ScriptSlot::Post, stage(staging.path(), "cleanup.sh", b"c"));
    job.prepare_commit();
    job.apply_commit(&manager).unwrap();

    let pre = uploads.path().join("0003_0007.pre");
    let post = uploads.path().join("0003_0007.post");

    // Second save replaces the pre script and drops the post script.
    job.attach_script(ScriptSlot::Pre, stage(staging.path(), "v2.sh", b"v2"));
    job.clear_script(ScriptSlot::Post);
    job.prepare_commit();
    job.apply_commit(&manager).unwrap();

    assert_eq!(job.script_label(ScriptSlot::Pre), Some("v2.sh"));
    assert_eq!(job.script_label(ScriptSlot::Post), None);
    assert_eq!(std::fs::read(&pre).unwrap(), b"v2");
    assert!(!post.exists());

    // Third save with no changes touches nothing.
    std::fs::write(&pre, b"hand-edited").unwrap();
    job.prepare_commit();
    job.apply_commit(&manager).unwrap();
    assert_eq!(std::fs::read(&pre).unwrap(), b"hand-edited");
}

#[test]
fn post_slot_failure_leaves_pre_committed() {
    let uploads = TempDir::new().unwrap();
    let staging = TempDir::new().unwrap();
    let manager = ScriptFileManager::new(uploads.path());

    let mut job = JobConfig::new(7, ClientRef { id: 3, url: None }, "nightly", "/srv/data");
    job.attach_script(ScriptSlot::Pre, stage(staging.path(), "setup.sh", b"ok"));
    // The post upload's staged file is gone by the time the commit applies.
    job.attach_script(
        ScriptSlot::Post,
        ScriptUpload::new("teardown.sh", staging.path().join("never-staged")),
    );

    job.prepare_commit();
    let result = job.apply_commit(&manager);
    assert!(result.is_err());

    // Pre was applied before post failed and is not rolled back.
    assert!(uploads.path().join("0003_0007.pre").exists());
    assert!(!uploads.path().join("0003_0007.post").exists());
}
