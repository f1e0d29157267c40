//! Failure handling specs
//!
//! Errors surface from a single reconcile and are retried by the next pass.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn missing_source_never_submits() {
    let world = World::new();
    world.submit("empty", "");
    world.runtime.resync().await;

    let building = world.runtime.get("empty").unwrap();
    let err = world.runtime.reconcile(&building).await.unwrap_err();

    assert!(matches!(err, ActionError::Validation(_)), "{}", err);
    assert_eq!(world.builds.start_calls(), 0);
    assert_eq!(
        world.phases(),
        vec![("empty".to_string(), Some(IntegrationPhase::Building))]
    );
}

#[tokio::test]
async fn unavailable_oracle_is_retried_next_pass() {
    let world = World::new();
    world.submit("hello", "code");
    world.runtime.resync().await;

    world.builds.set_unavailable(Some("connection refused"));
    let report = world.runtime.resync().await;
    assert_eq!(report.failed, 1);

    world.builds.set_unavailable(None);
    let report = world.runtime.resync().await;
    assert_eq!(report.submitted, 1);
    assert_eq!(world.builds.enqueued().len(), 1);
}

#[tokio::test]
async fn stale_snapshot_conflicts_and_converges() {
    let world = World::new();
    world.submit("hello", "code");
    world.runtime.resync().await;
    world.runtime.resync().await;
    let stale = world.runtime.get("hello").unwrap();

    // a newer write lands between snapshot and handle
    world.builds.set_status("build-1", BuildStatus::Completed);
    world.runtime.reconcile(&stale).await.unwrap();

    world.builds.set_failed("build-1", "ignored");
    let err = world.runtime.reconcile(&stale).await.unwrap_err();
    assert!(err.is_conflict(), "{}", err);

    // the next pass reads the fresh copy, which is no longer Building
    let report = world.runtime.resync().await;
    assert_eq!(report.skipped, 1);
    assert_eq!(
        world.phases(),
        vec![("hello".to_string(), Some(IntegrationPhase::Deploying))]
    );
}
