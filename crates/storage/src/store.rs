// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL-backed integration store with conditional writes

use crate::state::{MaterializedState, StoreError};
use crate::wal::{Wal, WalError};
use kiln_core::{Integration, Operation};
use std::path::Path;
use thiserror::Error;

/// Errors from committing an operation
#[derive(Debug, Error)]
pub enum CommitError {
    #[error(transparent)]
    Rejected(#[from] StoreError),
    #[error(transparent)]
    Wal(#[from] WalError),
}

/// Durable store: every accepted operation is logged before it is applied
///
/// Check, append and apply happen under `&mut self`, so callers sharing a
/// store behind a mutex get compare-and-set semantics for updates.
pub struct Store {
    wal: Wal,
    state: MaterializedState,
}

impl Store {
    /// Open the WAL at `path`, replaying any existing entries
    pub fn open(path: &Path) -> Result<Self, WalError> {
        let ops = Wal::replay(path)?;
        let state = MaterializedState::replay(&ops);
        let wal = Wal::open(path)?;
        Ok(Self { wal, state })
    }

    /// Validate, log and apply an operation. Returns the WAL sequence number.
    pub fn commit(&mut self, op: &Operation) -> Result<u64, CommitError> {
        self.state.check(op)?;
        let seq = self.wal.append(op)?;
        self.state.apply(op);
        Ok(seq)
    }

    pub fn get(&self, name: &str) -> Option<Integration> {
        self.state.get(name).cloned()
    }

    pub fn list(&self) -> Vec<Integration> {
        self.state.list()
    }

    pub fn state(&self) -> &MaterializedState {
        &self.state
    }

    /// Number of operations in the log
    pub fn sequence(&self) -> u64 {
        self.wal.sequence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::IntegrationPhase;

    #[test]
    fn rejected_operations_are_not_logged() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(&dir.path().join("kiln.wal")).unwrap();

        let create = Operation::IntegrationCreate {
            integration: Integration::new("hello", "code"),
        };
        assert_eq!(store.commit(&create).unwrap(), 1);

        let err = store.commit(&create).unwrap_err();
        assert!(matches!(
            err,
            CommitError::Rejected(StoreError::AlreadyExists(_))
        ));
        assert_eq!(store.sequence(), 1);
    }

    #[test]
    fn reopen_restores_state_and_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiln.wal");

        {
            let mut store = Store::open(&path).unwrap();
            store
                .commit(&Operation::IntegrationCreate {
                    integration: Integration::new("hello", "code"),
                })
                .unwrap();
            let current = store.get("hello").unwrap();
            store
                .commit(&Operation::IntegrationUpdate {
                    integration: current.with_phase(IntegrationPhase::Building),
                })
                .unwrap();
        }

        let store = Store::open(&path).unwrap();
        let hello = store.get("hello").unwrap();
        assert_eq!(hello.phase(), Some(IntegrationPhase::Building));
        assert_eq!(hello.metadata.resource_version, 2);
        assert_eq!(store.sequence(), 2);
    }
}
