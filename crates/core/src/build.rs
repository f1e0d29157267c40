// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build request and status types shared with the build oracle

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of the build for one identifier
///
/// `Error` and `Completed` are terminal: once an identifier reaches either,
/// the oracle never reports anything else for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildStatus {
    /// Never submitted
    #[default]
    NotRequested,
    Running,
    Error,
    Completed,
}

impl BuildStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildStatus::Error | BuildStatus::Completed)
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildStatus::NotRequested => "not_requested",
            BuildStatus::Running => "running",
            BuildStatus::Error => "error",
            BuildStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// A build request. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSource {
    pub identifier: String,
    pub code: String,
}

/// What the oracle knows about one identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
    pub identifier: String,
    pub status: BuildStatus,
    /// Failure detail when `status` is `Error`
    pub error: Option<String>,
}

impl BuildResult {
    pub fn not_requested(identifier: impl Into<String>) -> Self {
        Self::new(identifier, BuildStatus::NotRequested)
    }

    pub fn new(identifier: impl Into<String>, status: BuildStatus) -> Self {
        Self {
            identifier: identifier.into(),
            status,
            error: None,
        }
    }

    pub fn failed(identifier: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            status: BuildStatus::Error,
            error: Some(error.into()),
        }
    }
}
