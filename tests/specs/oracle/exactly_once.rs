//! Exactly-once build submission specs

use crate::prelude::*;
use kiln_adapters::{LocalBuildManager, NoOpBuildRunner, TracedBuildAdapter};
use kiln_core::BuildSource;
use similar_asserts::assert_eq;

fn source(identifier: &str) -> BuildSource {
    BuildSource {
        identifier: identifier.to_string(),
        code: "code".to_string(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_starts_enqueue_once() {
    let builds = TracedBuildAdapter::new(LocalBuildManager::new(NoOpBuildRunner::new()));

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..64 {
        let builds = builds.clone();
        tasks.spawn(async move { builds.start(source("build-1")).await.unwrap() });
    }

    let mut enqueued = 0;
    while let Some(submission) = tasks.join_next().await {
        if submission.unwrap() == Submission::Enqueued {
            enqueued += 1;
        }
    }

    assert_eq!(enqueued, 1);
    assert_eq!(builds.inner().len(), 1);
}

#[tokio::test]
async fn unknown_identifier_is_not_requested() {
    let builds = LocalBuildManager::new(NoOpBuildRunner::new());

    let result = builds.get("never-seen").await.unwrap();

    assert_eq!(result.status, BuildStatus::NotRequested);
    assert!(builds.is_empty());
}

#[tokio::test]
async fn repeated_handles_before_visibility_submit_once() {
    let world = World::with_builds(FakeBuildAdapter::with_delayed_visibility());
    world.submit("hello", "code");
    world.runtime.resync().await;
    let building = world.runtime.get("hello").unwrap();

    let (first, second) = tokio::join!(
        world.runtime.reconcile(&building),
        world.runtime.reconcile(&building)
    );

    let mut results = vec![first.unwrap(), second.unwrap()];
    results.sort_by_key(|r| format!("{r:?}"));
    assert_eq!(
        results,
        vec![
            Some(Reconciled::BuildRequested(Submission::AlreadySubmitted(
                BuildStatus::Running
            ))),
            Some(Reconciled::BuildRequested(Submission::Enqueued)),
        ]
    );
    assert_eq!(world.builds.enqueued().len(), 1);
}
