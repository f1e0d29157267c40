// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

use kiln_core::{Integration, Operation};
use std::collections::HashMap;
use thiserror::Error;

/// Reasons an operation cannot be applied to the current state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("integration not found: {0}")]
    NotFound(String),
    #[error("integration already exists: {0}")]
    AlreadyExists(String),
    #[error("conflict updating {name}: expected version {expected}, stored version is {actual}")]
    Conflict {
        name: String,
        expected: u64,
        actual: u64,
    },
}

/// Integrations built from WAL operations
#[derive(Debug, Default)]
pub struct MaterializedState {
    pub integrations: HashMap<String, Integration>,
    /// Highest version ever assigned per name; kept across deletes so a
    /// recreated integration never reuses a version
    versions: HashMap<String, u64>,
}

impl MaterializedState {
    /// Rebuild state from a sequence of operations
    pub fn replay<'a>(ops: impl IntoIterator<Item = &'a Operation>) -> Self {
        let mut state = Self::default();
        for op in ops {
            state.apply(op);
        }
        state
    }

    pub fn get(&self, name: &str) -> Option<&Integration> {
        self.integrations.get(name)
    }

    /// All integrations, ordered by name
    pub fn list(&self) -> Vec<Integration> {
        let mut all: Vec<_> = self.integrations.values().cloned().collect();
        all.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));
        all
    }

    /// Check that an operation is valid against the current state
    ///
    /// Updates are conditional: the snapshot's resource version must match
    /// the stored one, otherwise someone else wrote in between.
    pub fn check(&self, op: &Operation) -> Result<(), StoreError> {
        match op {
            Operation::IntegrationCreate { integration } => {
                if self.integrations.contains_key(integration.name()) {
                    return Err(StoreError::AlreadyExists(integration.name().to_string()));
                }
                Ok(())
            }
            Operation::IntegrationUpdate { integration } => {
                let stored = self
                    .integrations
                    .get(integration.name())
                    .ok_or_else(|| StoreError::NotFound(integration.name().to_string()))?;
                let expected = integration.metadata.resource_version;
                let actual = stored.metadata.resource_version;
                if expected != actual {
                    return Err(StoreError::Conflict {
                        name: integration.name().to_string(),
                        expected,
                        actual,
                    });
                }
                Ok(())
            }
            Operation::IntegrationDelete { name } => {
                if !self.integrations.contains_key(name) {
                    return Err(StoreError::NotFound(name.clone()));
                }
                Ok(())
            }
        }
    }

    /// Apply an operation to update the state
    ///
    /// Callers are expected to have passed `check` first; replay applies
    /// whatever the log holds.
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::IntegrationCreate { integration } => {
                let mut stored = integration.clone();
                stored.metadata.resource_version = self.next_version(integration.name());
                self.integrations.insert(stored.name().to_string(), stored);
            }

            Operation::IntegrationUpdate { integration } => {
                if self.integrations.contains_key(integration.name()) {
                    let mut stored = integration.clone();
                    stored.metadata.resource_version = self.next_version(integration.name());
                    self.integrations.insert(stored.name().to_string(), stored);
                }
            }

            Operation::IntegrationDelete { name } => {
                self.integrations.remove(name);
            }
        }
    }

    fn next_version(&mut self, name: &str) -> u64 {
        let version = self.versions.entry(name.to_string()).or_insert(0);
        *version += 1;
        *version
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
