// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build oracle adapters
//!
//! The oracle maps a build identifier to the status of at most one build.
//! Implementations own the exactly-once guarantee: callers may retry
//! `start` freely and must never observe a second execution for the same
//! identifier.

mod local;
mod noop;

pub use local::LocalBuildManager;
pub use noop::NoOpBuildRunner;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{BuildCall, FakeBuildAdapter};

use async_trait::async_trait;
use kiln_core::{BuildResult, BuildSource, BuildStatus};
use thiserror::Error;

/// Errors from build operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid build request: {0}")]
    InvalidRequest(String),
    #[error("build oracle unavailable: {0}")]
    Unavailable(String),
    #[error("build failed: {0}")]
    Failed(String),
}

/// Outcome of a `start` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// This call enqueued the build
    Enqueued,
    /// A build already exists for the identifier; nothing was started
    AlreadySubmitted(BuildStatus),
}

/// The build status oracle
#[async_trait]
pub trait BuildAdapter: Clone + Send + Sync + 'static {
    /// Request a build unless one already exists for `source.identifier`
    async fn start(&self, source: BuildSource) -> Result<Submission, BuildError>;

    /// Latest status for an identifier (`NotRequested` if never submitted)
    async fn get(&self, identifier: &str) -> Result<BuildResult, BuildError>;
}

/// Executes one build. Compilation itself lives behind this seam.
#[async_trait]
pub trait BuildRunner: Clone + Send + Sync + 'static {
    async fn run(&self, source: &BuildSource) -> Result<(), BuildError>;
}
