// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use kiln_adapters::{BuildAdapter, BuildError, Submission};
use kiln_core::{Effect, Integration, Operation, TracedEffect};
use kiln_storage::{CommitError, Store, StoreError, WalError};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::Instrument;

/// Errors that can occur during effect execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("build error: {0}")]
    Build(#[from] BuildError),
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("WAL error: {0}")]
    Wal(#[from] WalError),
}

impl From<CommitError> for ExecuteError {
    fn from(e: CommitError) -> Self {
        match e {
            CommitError::Rejected(e) => ExecuteError::Storage(e),
            CommitError::Wal(e) => ExecuteError::Wal(e),
        }
    }
}

/// Result of a successfully executed effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The oracle accepted (or deduplicated) a build request
    Submitted(Submission),
    /// The operation was logged; carries the stored integration, if it still exists
    Persisted {
        integration: Option<Integration>,
        seq: u64,
    },
}

/// Executes effects against the build oracle and the store
#[derive(Clone)]
pub struct Executor<B> {
    builds: B,
    store: Arc<Mutex<Store>>,
}

impl<B: BuildAdapter> Executor<B> {
    pub fn new(builds: B, store: Arc<Mutex<Store>>) -> Self {
        Self { builds, store }
    }

    /// Execute a single effect with tracing
    pub async fn execute(&self, effect: Effect) -> Result<Outcome, ExecuteError> {
        let span = tracing::info_span!("effect", effect = effect.name());
        span.in_scope(|| tracing::info!(fields = ?effect.fields(), "executing"));

        let start = std::time::Instant::now();
        let result = self.execute_inner(effect).instrument(span.clone()).await;
        let elapsed = start.elapsed();

        span.in_scope(|| match &result {
            Ok(outcome) => tracing::info!(
                elapsed_ms = elapsed.as_millis() as u64,
                ?outcome,
                "completed"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "failed"
            ),
        });

        result
    }

    async fn execute_inner(&self, effect: Effect) -> Result<Outcome, ExecuteError> {
        match effect {
            Effect::StartBuild { source } => {
                let submission = self.builds.start(source).await?;
                Ok(Outcome::Submitted(submission))
            }
            Effect::Persist { operation } => self.persist(&operation),
        }
    }

    fn persist(&self, operation: &Operation) -> Result<Outcome, ExecuteError> {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let seq = store.commit(operation)?;
        Ok(Outcome::Persisted {
            integration: store.get(operation.integration_name()),
            seq,
        })
    }

    /// The build oracle effects are submitted to
    pub fn builds(&self) -> &B {
        &self.builds
    }

    /// Get a reference to the store
    pub fn store(&self) -> Arc<Mutex<Store>> {
        Arc::clone(&self.store)
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
