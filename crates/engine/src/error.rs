// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for reconcile actions

use crate::ExecuteError;
use kiln_adapters::BuildError;
use kiln_core::ValidationError;
use kiln_storage::StoreError;
use thiserror::Error;

/// Errors returned from handling one integration
///
/// None of these are retried in place. The next resync pass re-reads the
/// integration and tries again.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("build status lookup failed: {0}")]
    Lookup(#[from] BuildError),
    #[error("execute error: {0}")]
    Execute(#[from] ExecuteError),
}

impl ActionError {
    /// The integration changed since the snapshot was taken
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ActionError::Execute(ExecuteError::Storage(StoreError::Conflict { .. }))
        )
    }
}
