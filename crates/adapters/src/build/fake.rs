// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake build oracle for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{BuildAdapter, BuildError, Submission};
use async_trait::async_trait;
use kiln_core::{BuildResult, BuildSource, BuildStatus};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Recorded oracle call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildCall {
    Start { source: BuildSource },
    Get { identifier: String },
}

#[derive(Default)]
struct FakeBuilds {
    results: HashMap<String, BuildResult>,
    /// Submitted but not yet visible to `get` (delayed visibility mode)
    pending: HashSet<String>,
    /// Builds actually enqueued, in order
    enqueued: Vec<BuildSource>,
}

/// Fake build oracle for testing
///
/// Builds never run on their own; tests move them along with
/// [`FakeBuildAdapter::set_status`].
#[derive(Clone, Default)]
pub struct FakeBuildAdapter {
    builds: Arc<Mutex<FakeBuilds>>,
    calls: Arc<Mutex<Vec<BuildCall>>>,
    delayed_visibility: bool,
    unavailable: Arc<Mutex<Option<String>>>,
}

impl FakeBuildAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submitted builds keep reporting `NotRequested` until `set_status`
    /// is called for them, like an oracle with an asynchronous queue.
    pub fn with_delayed_visibility() -> Self {
        Self {
            delayed_visibility: true,
            ..Self::default()
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<BuildCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of `start` calls, including deduplicated ones
    pub fn start_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BuildCall::Start { .. }))
            .count()
    }

    /// Builds that were actually enqueued
    pub fn enqueued(&self) -> Vec<BuildSource> {
        self.builds
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .enqueued
            .clone()
    }

    /// Force the status for an identifier
    pub fn set_status(&self, identifier: &str, status: BuildStatus) {
        self.set_result(BuildResult::new(identifier, status));
    }

    /// Mark an identifier failed with a message
    pub fn set_failed(&self, identifier: &str, error: &str) {
        self.set_result(BuildResult::failed(identifier, error));
    }

    /// Make every call fail with `BuildError::Unavailable`
    pub fn set_unavailable(&self, reason: Option<&str>) {
        *self.unavailable.lock().unwrap_or_else(|e| e.into_inner()) = reason.map(str::to_string);
    }

    fn set_result(&self, result: BuildResult) {
        let mut builds = self.builds.lock().unwrap_or_else(|e| e.into_inner());
        builds.pending.remove(&result.identifier);
        builds.results.insert(result.identifier.clone(), result);
    }

    fn record(&self, call: BuildCall) -> Result<(), BuildError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        match self
            .unavailable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            Some(reason) => Err(BuildError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BuildAdapter for FakeBuildAdapter {
    async fn start(&self, source: BuildSource) -> Result<Submission, BuildError> {
        self.record(BuildCall::Start {
            source: source.clone(),
        })?;

        let mut builds = self.builds.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = builds.results.get(&source.identifier) {
            return Ok(Submission::AlreadySubmitted(existing.status));
        }
        if builds.pending.contains(&source.identifier) {
            return Ok(Submission::AlreadySubmitted(BuildStatus::Running));
        }

        if self.delayed_visibility {
            builds.pending.insert(source.identifier.clone());
        } else {
            builds.results.insert(
                source.identifier.clone(),
                BuildResult::new(&source.identifier, BuildStatus::Running),
            );
        }
        builds.enqueued.push(source);
        Ok(Submission::Enqueued)
    }

    async fn get(&self, identifier: &str) -> Result<BuildResult, BuildError> {
        self.record(BuildCall::Get {
            identifier: identifier.to_string(),
        })?;

        let builds = self.builds.lock().unwrap_or_else(|e| e.into_inner());
        Ok(builds
            .results
            .get(identifier)
            .cloned()
            .unwrap_or_else(|| BuildResult::not_requested(identifier)))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
