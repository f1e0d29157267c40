//! Build lifecycle specs
//!
//! A submitted integration is given an identifier, built once, and moved
//! to Deploying or Error depending on the build outcome.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn integration_is_built_then_deploying() {
    let world = World::new();
    world.submit("hello", "from('timer:tick').log('hi')");

    world.runtime.resync().await;
    let hello = world.runtime.get("hello").unwrap();
    assert_eq!(hello.phase(), Some(IntegrationPhase::Building));
    assert_eq!(hello.status.identifier, "build-1");
    assert_eq!(
        world.builds.get("build-1").await.unwrap().status,
        BuildStatus::NotRequested
    );

    let report = world.runtime.resync().await;
    assert_eq!(report.submitted, 1);
    assert_eq!(
        world.builds.get("build-1").await.unwrap().status,
        BuildStatus::Running
    );
    assert_eq!(world.builds.enqueued().len(), 1);

    world.builds.set_status("build-1", BuildStatus::Completed);
    world.runtime.resync().await;

    assert_eq!(
        world.phases(),
        vec![("hello".to_string(), Some(IntegrationPhase::Deploying))]
    );
}

#[tokio::test]
async fn failed_build_marks_integration_error() {
    let world = World::new();
    world.submit("hello", "code");
    world.runtime.resync().await;
    world.runtime.resync().await;

    world.builds.set_failed("build-1", "compile error");
    let writes = world.writes();
    let report = world.runtime.resync().await;

    assert_eq!(report.updated, 1);
    assert_eq!(world.writes(), writes + 1);
    assert_eq!(
        world.phases(),
        vec![("hello".to_string(), Some(IntegrationPhase::Error))]
    );
}

#[tokio::test]
async fn running_build_is_left_alone() {
    let world = World::new();
    world.submit("hello", "code");
    world.runtime.resync().await;
    world.runtime.resync().await;
    let writes = world.writes();

    for _ in 0..5 {
        let report = world.runtime.resync().await;
        assert_eq!(
            report,
            ResyncReport {
                scanned: 1,
                unchanged: 1,
                ..ResyncReport::default()
            }
        );
    }

    assert_eq!(world.writes(), writes);
    assert_eq!(world.builds.start_calls(), 1);
}

#[tokio::test]
async fn integrations_progress_independently() {
    let world = World::new();
    world.submit("alpha", "code");
    world.submit("beta", "code");
    world.submit("gamma", "code");
    world.runtime.resync().await;
    world.runtime.resync().await;

    let alpha = world.runtime.get("alpha").unwrap().status.identifier;
    let beta = world.runtime.get("beta").unwrap().status.identifier;
    world.builds.set_status(&alpha, BuildStatus::Completed);
    world.builds.set_failed(&beta, "boom");
    world.runtime.resync().await;

    assert_eq!(
        world.phases(),
        vec![
            ("alpha".to_string(), Some(IntegrationPhase::Deploying)),
            ("beta".to_string(), Some(IntegrationPhase::Error)),
            ("gamma".to_string(), Some(IntegrationPhase::Building)),
        ]
    );
}
