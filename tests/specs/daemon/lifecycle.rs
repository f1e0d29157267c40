//! Daemon lifecycle specs
//!
//! Verify startup, manifest intake and recovery from the WAL.

use crate::prelude::*;
use kiln_daemon::{startup, Config, Daemon, LifecycleError};
use similar_asserts::assert_eq;
use std::time::Duration;

async fn settle(daemon: &Daemon, name: &str, phase: IntegrationPhase) {
    for _ in 0..50 {
        daemon.run_pass().await;
        if daemon.runtime.get(name).and_then(|i| i.phase()) == Some(phase) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{name} never reached {phase}");
}

#[tokio::test]
async fn daemon_builds_dropped_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_state_dir(dir.path());
    let daemon = startup(&config).unwrap();

    std::fs::write(
        config.inbox_path.join("hello.json"),
        serde_json::json!({"name": "hello", "code": "from('timer:tick')"}).to_string(),
    )
    .unwrap();

    settle(&daemon, "hello", IntegrationPhase::Deploying).await;
    assert!(std::fs::read_dir(&config.inbox_path)
        .unwrap()
        .next()
        .is_none());
}

#[tokio::test]
async fn daemon_recovers_state_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::from_toml(&format!(
        "state_dir = {:?}\nresync_interval = \"1s\"\n",
        dir.path()
    ))
    .unwrap();

    {
        let mut daemon = startup(&config).unwrap();
        daemon
            .runtime
            .submit(Integration::new("hello", "code"))
            .unwrap();
        settle(&daemon, "hello", IntegrationPhase::Deploying).await;
        daemon.shutdown();
    }

    let daemon = startup(&config).unwrap();
    let phases: Vec<_> = daemon
        .runtime
        .list()
        .into_iter()
        .map(|i| (i.metadata.name.clone(), i.phase()))
        .collect();
    assert_eq!(
        phases,
        vec![("hello".to_string(), Some(IntegrationPhase::Deploying))]
    );
}

#[test]
fn only_one_daemon_per_state_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_state_dir(dir.path());
    let _first = startup(&config).unwrap();

    let second = startup(&config);

    assert!(matches!(second, Err(LifecycleError::LockFailed(_))));
}
