// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kiln_core::IntegrationPhase;
use std::time::Duration;
use tempfile::TempDir;

fn test_config() -> (Config, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    (Config::with_state_dir(dir.path().join("state")), dir)
}

fn drop_manifest(config: &Config, file: &str, json: &str) {
    std::fs::write(config.inbox_path.join(file), json).unwrap();
}

/// Run passes until the integration reaches `phase`, or give up
async fn pass_until(daemon: &Daemon, name: &str, phase: IntegrationPhase) -> bool {
    for _ in 0..50 {
        daemon.run_pass().await;
        if daemon.runtime.get(name).and_then(|i| i.phase()) == Some(phase) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[test]
fn startup_creates_layout_and_writes_pid() {
    let (config, _dir) = test_config();

    let _daemon = startup(&config).unwrap();

    assert!(config.inbox_path.is_dir());
    assert!(config.wal_path.parent().unwrap().is_dir());
    let pid = std::fs::read_to_string(&config.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());
}

#[test]
fn second_startup_fails_while_locked() {
    let (config, _dir) = test_config();
    let _daemon = startup(&config).unwrap();

    let err = startup(&config).err().unwrap();

    assert!(matches!(err, LifecycleError::LockFailed(_)), "{}", err);
}

#[test]
fn shutdown_removes_pid_file() {
    let (config, _dir) = test_config();
    let mut daemon = startup(&config).unwrap();

    daemon.shutdown();

    assert!(!config.lock_path.exists());
}

#[tokio::test]
async fn manifest_is_built_and_deployed() {
    let (config, _dir) = test_config();
    let daemon = startup(&config).unwrap();
    drop_manifest(
        &config,
        "hello.json",
        r#"{"name": "hello", "code": "from('timer:tick').log('hi')"}"#,
    );

    let report = daemon.run_pass().await;
    assert_eq!(report.intake.accepted, vec!["hello".to_string()]);
    assert!(!config.inbox_path.join("hello.json").exists());

    assert!(pass_until(&daemon, "hello", IntegrationPhase::Deploying).await);
    let hello = daemon.runtime.get("hello").unwrap();
    assert!(!hello.status.identifier.is_empty());
}

#[tokio::test]
async fn invalid_manifest_is_set_aside() {
    let (config, _dir) = test_config();
    let daemon = startup(&config).unwrap();
    drop_manifest(&config, "broken.json", "{ not json");

    let report = daemon.run_pass().await;

    assert!(report.intake.accepted.is_empty());
    assert_eq!(
        report.intake.rejected,
        vec![config.inbox_path.join("broken.rejected")]
    );
    assert!(config.inbox_path.join("broken.rejected").exists());
    assert_eq!(report.resync.scanned, 0);
}

#[tokio::test]
async fn state_survives_restart() {
    let (config, _dir) = test_config();
    {
        let mut daemon = startup(&config).unwrap();
        drop_manifest(&config, "hello.json", r#"{"name": "hello", "code": "code"}"#);
        daemon.run_pass().await;
        assert_eq!(
            daemon.runtime.get("hello").unwrap().phase(),
            Some(IntegrationPhase::Building)
        );
        daemon.shutdown();
    }

    let daemon = startup(&config).unwrap();
    let hello = daemon.runtime.get("hello").unwrap();

    assert_eq!(hello.phase(), Some(IntegrationPhase::Building));
    assert_eq!(hello.metadata.resource_version, 2);
    // the oracle is in-memory, so the build is requested again after restart
    assert!(pass_until(&daemon, "hello", IntegrationPhase::Deploying).await);
}
