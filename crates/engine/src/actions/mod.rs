// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconcile actions
//!
//! Each action owns one slice of the integration lifecycle. The runtime
//! offers a snapshot to each action in turn and runs the first that accepts it.

mod build;
mod initialize;

pub use build::BuildAction;
pub use initialize::InitializeAction;

use crate::error::ActionError;
use crate::executor::Outcome;
use async_trait::async_trait;
use kiln_adapters::Submission;
use kiln_core::Integration;

/// What an action did with a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// A build was requested for the integration's identifier
    BuildRequested(Submission),
    /// The integration was updated; this is the stored copy
    Updated(Integration),
    /// Nothing to do yet
    Unchanged,
}

impl From<Outcome> for Reconciled {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Submitted(submission) => Reconciled::BuildRequested(submission),
            Outcome::Persisted {
                integration: Some(integration),
                ..
            } => Reconciled::Updated(integration),
            Outcome::Persisted {
                integration: None, ..
            } => Reconciled::Unchanged,
        }
    }
}

/// One step of the integration lifecycle
///
/// `handle` must be safe to call again with the same snapshot: the control
/// loop is level-triggered and re-delivers integrations on every resync.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this action is responsible for the integration's current phase
    fn can_handle(&self, integration: &Integration) -> bool;

    /// Apply at most one transition
    async fn handle(&self, integration: &Integration) -> Result<Reconciled, ActionError>;
}
