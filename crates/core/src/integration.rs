// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integration resource model
//!
//! An integration is the user-submitted resource that asks for some source to
//! be built and deployed. Only the reconciler writes `status.phase`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of an integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegrationPhase {
    /// Waiting for (or running) a build of its source
    Building,
    /// Build completed, ready to be rolled out
    Deploying,
    /// Rolled out
    Running,
    /// Build failed; needs resubmission under a new identifier
    Error,
}

impl IntegrationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationPhase::Building => "Building",
            IntegrationPhase::Deploying => "Deploying",
            IntegrationPhase::Running => "Running",
            IntegrationPhase::Error => "Error",
        }
    }
}

impl fmt::Display for IntegrationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    /// Version of the stored copy this snapshot was read from.
    /// Updates are rejected unless it still matches the stored version.
    #[serde(default)]
    pub resource_version: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationSpec {
    #[serde(default)]
    pub source: SourceSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationStatus {
    /// Unset until the integration has been initialized
    #[serde(default)]
    pub phase: Option<IntegrationPhase>,
    /// Key into the build oracle
    #[serde(default)]
    pub identifier: String,
}

/// An integration resource snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: IntegrationSpec,
    #[serde(default)]
    pub status: IntegrationStatus,
}

impl Integration {
    /// Create a fresh, uninitialized integration
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.into(),
                resource_version: 0,
            },
            spec: IntegrationSpec {
                source: SourceSpec {
                    code: Some(code.into()),
                },
            },
            status: IntegrationStatus::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn phase(&self) -> Option<IntegrationPhase> {
        self.status.phase
    }

    /// Source code, if present and not blank
    pub fn source_code(&self) -> Option<&str> {
        self.spec
            .source
            .code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
    }

    /// Copy of this snapshot with only the phase changed
    pub fn with_phase(&self, phase: IntegrationPhase) -> Self {
        let mut target = self.clone();
        target.status.phase = Some(phase);
        target
    }

    /// Set the build identifier
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.status.identifier = identifier.into();
        self
    }
}

#[cfg(test)]
#[path = "integration_tests.rs"]
mod tests;
