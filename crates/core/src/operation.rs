// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations for the write-ahead log

use crate::integration::Integration;
use serde::{Deserialize, Serialize};

/// Resource changes that are persisted to the WAL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Store a newly submitted integration
    IntegrationCreate { integration: Integration },

    /// Replace a stored integration.
    /// Only valid if `integration.metadata.resource_version` matches the stored copy.
    IntegrationUpdate { integration: Integration },

    /// Remove an integration
    IntegrationDelete { name: String },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::IntegrationCreate { .. } => "integration_create",
            Operation::IntegrationUpdate { .. } => "integration_update",
            Operation::IntegrationDelete { .. } => "integration_delete",
        }
    }

    /// Name of the integration this operation touches
    pub fn integration_name(&self) -> &str {
        match self {
            Operation::IntegrationCreate { integration }
            | Operation::IntegrationUpdate { integration } => integration.name(),
            Operation::IntegrationDelete { name } => name,
        }
    }

    pub fn integration(&self) -> Option<&Integration> {
        match self {
            Operation::IntegrationCreate { integration }
            | Operation::IntegrationUpdate { integration } => Some(integration),
            Operation::IntegrationDelete { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
