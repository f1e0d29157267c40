// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime for the kiln reconciler
//!
//! Routes each integration to the first action that claims its phase and
//! drives periodic resync passes over everything in the store.

use crate::actions::{Action, BuildAction, InitializeAction, Reconciled};
use crate::error::ActionError;
use crate::executor::{ExecuteError, Executor};
use kiln_adapters::BuildAdapter;
use kiln_core::{IdGen, Integration, Operation};
use kiln_storage::{Store, StoreError};
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;
use tracing::Instrument;

/// Tally of a single resync pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResyncReport {
    /// Integrations read from the store
    pub scanned: usize,
    /// Builds requested (enqueued or deduplicated)
    pub submitted: usize,
    /// Integrations whose stored copy changed
    pub updated: usize,
    /// Claimed by an action that had nothing to do
    pub unchanged: usize,
    /// No action claims the phase
    pub skipped: usize,
    /// Handle returned an error; retried next pass
    pub failed: usize,
}

impl ResyncReport {
    fn record(&mut self, result: &Result<Option<Reconciled>, ActionError>) {
        match result {
            Ok(Some(Reconciled::BuildRequested(_))) => self.submitted += 1,
            Ok(Some(Reconciled::Updated(_))) => self.updated += 1,
            Ok(Some(Reconciled::Unchanged)) => self.unchanged += 1,
            Ok(None) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }
}

#[derive(Clone)]
pub struct Runtime {
    actions: Arc<Vec<Arc<dyn Action>>>,
    store: Arc<Mutex<Store>>,
}

impl Runtime {
    /// Create a runtime with an explicit action list, consulted in order
    pub fn new(store: Arc<Mutex<Store>>, actions: Vec<Arc<dyn Action>>) -> Self {
        Self {
            actions: Arc::new(actions),
            store,
        }
    }

    /// Runtime with the initialize and build actions sharing one oracle
    pub fn standard<B, I>(builds: B, id_gen: I, store: Arc<Mutex<Store>>) -> Self
    where
        B: BuildAdapter,
        I: IdGen,
    {
        let executor = Executor::new(builds, Arc::clone(&store));
        let actions: Vec<Arc<dyn Action>> = vec![
            Arc::new(InitializeAction::new(executor.clone(), id_gen)),
            Arc::new(BuildAction::new(executor)),
        ];
        Self::new(store, actions)
    }

    /// Names of the registered actions, in routing order
    pub fn action_names(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    /// Reconcile one integration snapshot
    ///
    /// Returns `Ok(None)` when no action handles the integration's phase.
    pub async fn reconcile(
        &self,
        integration: &Integration,
    ) -> Result<Option<Reconciled>, ActionError> {
        route(&self.actions, integration).await
    }

    /// Store a new integration; it is picked up on the next pass
    pub fn submit(&self, integration: Integration) -> Result<Integration, ExecuteError> {
        self.commit(Operation::IntegrationCreate { integration })
    }

    /// Remove an integration from the store
    pub fn delete(&self, name: &str) -> Result<(), ExecuteError> {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.commit(&Operation::IntegrationDelete {
            name: name.to_string(),
        })?;
        tracing::info!(integration = name, "integration deleted");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Integration> {
        self.store
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
    }

    pub fn list(&self) -> Vec<Integration> {
        self.store.lock().unwrap_or_else(|e| e.into_inner()).list()
    }

    /// Reconcile every stored integration once, concurrently
    ///
    /// Each integration is handled from a snapshot taken at the start of the
    /// pass. Errors are logged and counted; they never abort the pass.
    pub async fn resync(&self) -> ResyncReport {
        let snapshot = self.list();
        let mut report = ResyncReport {
            scanned: snapshot.len(),
            ..ResyncReport::default()
        };

        let mut tasks = JoinSet::new();
        for integration in snapshot {
            let actions = Arc::clone(&self.actions);
            tasks.spawn(async move {
                let result = route(&actions, &integration).await;
                (integration.metadata.name, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, result)) => {
                    if let Err(e) = &result {
                        if e.is_conflict() {
                            tracing::debug!(
                                integration = %name,
                                error = %e,
                                "stale snapshot, retrying next pass"
                            );
                        } else {
                            tracing::warn!(integration = %name, error = %e, "reconcile failed");
                        }
                    }
                    report.record(&result);
                }
                Err(e) => {
                    tracing::error!(error = %e, "reconcile task panicked");
                    report.failed += 1;
                }
            }
        }

        tracing::debug!(?report, "resync complete");
        report
    }

    fn commit(&self, operation: Operation) -> Result<Integration, ExecuteError> {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.commit(&operation)?;
        let name = operation.integration_name();
        let stored = store
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        tracing::info!(
            integration = name,
            version = stored.metadata.resource_version,
            "integration stored"
        );
        Ok(stored)
    }
}

async fn route(
    actions: &[Arc<dyn Action>],
    integration: &Integration,
) -> Result<Option<Reconciled>, ActionError> {
    let Some(action) = actions.iter().find(|a| a.can_handle(integration)) else {
        tracing::trace!(integration = integration.name(), "no action for phase");
        return Ok(None);
    };

    let span = tracing::info_span!(
        "reconcile",
        integration = integration.name(),
        action = action.name(),
        version = integration.metadata.resource_version,
    );
    action
        .handle(integration)
        .instrument(span)
        .await
        .map(Some)
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
