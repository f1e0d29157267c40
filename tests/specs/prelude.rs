//! Shared fixtures for specs

pub use kiln_adapters::{BuildAdapter, FakeBuildAdapter, Submission};
pub use kiln_core::{BuildStatus, Integration, IntegrationPhase, SequentialIdGen};
pub use kiln_engine::{ActionError, Reconciled, ResyncReport, Runtime};

use kiln_storage::Store;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// A runtime over a fresh on-disk store and a fake oracle
pub struct World {
    pub runtime: Runtime,
    pub builds: FakeBuildAdapter,
    pub store: Arc<Mutex<Store>>,
    _dir: TempDir,
}

impl World {
    pub fn new() -> Self {
        Self::with_builds(FakeBuildAdapter::new())
    }

    pub fn with_builds(builds: FakeBuildAdapter) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Mutex::new(
            Store::open(&dir.path().join("operations.wal")).unwrap(),
        ));
        let runtime = Runtime::standard(
            builds.clone(),
            SequentialIdGen::default(),
            Arc::clone(&store),
        );
        Self {
            runtime,
            builds,
            store,
            _dir: dir,
        }
    }

    pub fn submit(&self, name: &str, code: &str) -> Integration {
        self.runtime.submit(Integration::new(name, code)).unwrap()
    }

    /// Name and phase of every stored integration, sorted by name
    pub fn phases(&self) -> Vec<(String, Option<IntegrationPhase>)> {
        self.runtime
            .list()
            .into_iter()
            .map(|i| (i.metadata.name.clone(), i.phase()))
            .collect()
    }

    /// Number of operations written so far
    pub fn writes(&self) -> u64 {
        self.store.lock().unwrap().sequence()
    }
}
