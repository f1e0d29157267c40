// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Initialization action: give new integrations an identifier and start building

use super::{Action, Reconciled};
use crate::error::ActionError;
use crate::executor::Executor;
use async_trait::async_trait;
use kiln_adapters::BuildAdapter;
use kiln_core::{Effect, IdGen, Integration, IntegrationPhase, Operation};

/// Handles integrations that have no phase yet
pub struct InitializeAction<B, I> {
    executor: Executor<B>,
    id_gen: I,
}

impl<B: BuildAdapter, I: IdGen> InitializeAction<B, I> {
    pub fn new(executor: Executor<B>, id_gen: I) -> Self {
        Self { executor, id_gen }
    }
}

#[async_trait]
impl<B: BuildAdapter, I: IdGen> Action for InitializeAction<B, I> {
    fn name(&self) -> &'static str {
        "initialize"
    }

    fn can_handle(&self, integration: &Integration) -> bool {
        integration.phase().is_none()
    }

    async fn handle(&self, integration: &Integration) -> Result<Reconciled, ActionError> {
        // Keep a caller-assigned identifier
        let identifier = if integration.status.identifier.trim().is_empty() {
            self.id_gen.next()
        } else {
            integration.status.identifier.clone()
        };

        tracing::info!(identifier = %identifier, "initializing");

        let target = integration
            .with_phase(IntegrationPhase::Building)
            .with_identifier(identifier);
        let outcome = self
            .executor
            .execute(Effect::Persist {
                operation: Operation::IntegrationUpdate { integration: target },
            })
            .await?;
        Ok(outcome.into())
    }
}
