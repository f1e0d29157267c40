// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kiln_adapters::FakeBuildAdapter;
use kiln_core::{BuildSource, BuildStatus, IntegrationPhase};
use tempfile::TempDir;

fn setup() -> (Executor<FakeBuildAdapter>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(&dir.path().join("test.wal")).unwrap();
    (
        Executor::new(FakeBuildAdapter::new(), Arc::new(Mutex::new(store))),
        dir,
    )
}

#[tokio::test]
async fn executor_start_build_effect() {
    let (executor, _dir) = setup();

    let outcome = executor
        .execute(Effect::StartBuild {
            source: BuildSource {
                identifier: "build-1".to_string(),
                code: "code".to_string(),
            },
        })
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Submitted(Submission::Enqueued));
    assert_eq!(
        executor.builds().get("build-1").await.unwrap().status,
        BuildStatus::Running
    );
}

#[tokio::test]
async fn executor_persist_effect() {
    let (executor, _dir) = setup();

    let outcome = executor
        .execute(Effect::Persist {
            operation: Operation::IntegrationCreate {
                integration: Integration::new("hello", "code"),
            },
        })
        .await
        .unwrap();

    let Outcome::Persisted { integration, seq } = outcome else {
        panic!("expected Persisted");
    };
    assert_eq!(seq, 1);
    assert_eq!(integration.unwrap().metadata.resource_version, 1);

    let store = executor.store();
    let store = store.lock().unwrap();
    assert!(store.get("hello").is_some());
}

#[tokio::test]
async fn executor_persist_conflict_is_an_error() {
    let (executor, _dir) = setup();
    executor
        .execute(Effect::Persist {
            operation: Operation::IntegrationCreate {
                integration: Integration::new("hello", "code"),
            },
        })
        .await
        .unwrap();

    // snapshot with version 0 is older than the stored version 1
    let stale = Integration::new("hello", "code").with_phase(IntegrationPhase::Building);
    let err = executor
        .execute(Effect::Persist {
            operation: Operation::IntegrationUpdate { integration: stale },
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ExecuteError::Storage(StoreError::Conflict {
            expected: 0,
            actual: 1,
            ..
        })
    ));
    assert_eq!(executor.store().lock().unwrap().sequence(), 1);
}

#[tokio::test]
async fn executor_propagates_oracle_failure() {
    let (executor, _dir) = setup();
    executor.builds().set_unavailable(Some("down"));

    let err = executor
        .execute(Effect::StartBuild {
            source: BuildSource {
                identifier: "build-1".to_string(),
                code: "code".to_string(),
            },
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ExecuteError::Build(BuildError::Unavailable(_))));
}
