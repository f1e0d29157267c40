// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process build oracle

use super::{BuildAdapter, BuildError, BuildRunner, Submission};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use kiln_core::{BuildResult, BuildSource, BuildStatus, Clock, SystemClock};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct BuildRecord {
    status: BuildStatus,
    error: Option<String>,
    started_at: Instant,
}

impl BuildRecord {
    fn to_result(&self, identifier: &str) -> BuildResult {
        BuildResult {
            identifier: identifier.to_string(),
            status: self.status,
            error: self.error.clone(),
        }
    }

    /// Move a running build to a terminal status. Terminal records are left alone.
    fn finish(&mut self, status: BuildStatus, error: Option<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = status;
        self.error = error;
        true
    }
}

/// Build oracle that executes builds on the local tokio runtime
///
/// Statuses live in a sharded map so lookups for unrelated identifiers do not
/// contend. The vacant-entry insert in `start` happens under the shard lock,
/// which is what makes enqueue exactly-once per identifier.
#[derive(Clone)]
pub struct LocalBuildManager<R, C = SystemClock> {
    builds: Arc<DashMap<String, BuildRecord>>,
    runner: R,
    clock: C,
    timeout: Option<Duration>,
}

impl<R: BuildRunner> LocalBuildManager<R, SystemClock> {
    pub fn new(runner: R) -> Self {
        Self::with_clock(runner, SystemClock)
    }
}

impl<R: BuildRunner, C: Clock> LocalBuildManager<R, C> {
    pub fn with_clock(runner: R, clock: C) -> Self {
        Self {
            builds: Arc::new(DashMap::new()),
            runner,
            clock,
            timeout: None,
        }
    }

    /// Fail builds that stay `Running` longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of identifiers ever submitted
    pub fn len(&self) -> usize {
        self.builds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }

    fn is_expired(&self, record: &BuildRecord) -> bool {
        match self.timeout {
            Some(timeout) => {
                record.status == BuildStatus::Running
                    && self.clock.since(record.started_at) >= timeout
            }
            None => false,
        }
    }
}

#[async_trait]
impl<R: BuildRunner, C: Clock> BuildAdapter for LocalBuildManager<R, C> {
    async fn start(&self, source: BuildSource) -> Result<Submission, BuildError> {
        if source.identifier.trim().is_empty() {
            return Err(BuildError::InvalidRequest("empty build identifier".to_string()));
        }

        match self.builds.entry(source.identifier.clone()) {
            Entry::Occupied(existing) => {
                return Ok(Submission::AlreadySubmitted(existing.get().status));
            }
            Entry::Vacant(slot) => {
                slot.insert(BuildRecord {
                    status: BuildStatus::Running,
                    error: None,
                    started_at: self.clock.now(),
                });
            }
        }

        let builds = Arc::clone(&self.builds);
        let runner = self.runner.clone();
        tokio::spawn(async move {
            let outcome = runner.run(&source).await;
            let Some(mut record) = builds.get_mut(&source.identifier) else {
                return;
            };
            let finished = match outcome {
                Ok(()) => record.finish(BuildStatus::Completed, None),
                Err(e) => record.finish(BuildStatus::Error, Some(e.to_string())),
            };
            if finished {
                tracing::info!(
                    identifier = %source.identifier,
                    status = %record.status,
                    "build finished"
                );
            } else {
                tracing::debug!(
                    identifier = %source.identifier,
                    status = %record.status,
                    "build finished after reaching a terminal status; result dropped"
                );
            }
        });

        Ok(Submission::Enqueued)
    }

    async fn get(&self, identifier: &str) -> Result<BuildResult, BuildError> {
        let Some(mut record) = self.builds.get_mut(identifier) else {
            return Ok(BuildResult::not_requested(identifier));
        };

        if self.is_expired(&record) {
            let timeout = self.timeout.unwrap_or_default();
            record.finish(
                BuildStatus::Error,
                Some(format!("build timed out after {:?}", timeout)),
            );
            tracing::warn!(identifier, ?timeout, "build timed out");
        }

        Ok(record.to_result(identifier))
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
