// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build phase action

use super::{Action, Reconciled};
use crate::error::ActionError;
use crate::executor::Executor;
use async_trait::async_trait;
use kiln_adapters::BuildAdapter;
use kiln_core::decision::{self, Decision};
use kiln_core::{Integration, IntegrationPhase};

/// Drives an integration in `Building` through its build
///
/// Per call it either submits the build, moves the integration to `Error`
/// or `Deploying` once the build is terminal, or does nothing while the
/// build runs. It never waits for the build itself.
pub struct BuildAction<B> {
    executor: Executor<B>,
}

impl<B: BuildAdapter> BuildAction<B> {
    pub fn new(executor: Executor<B>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl<B: BuildAdapter> Action for BuildAction<B> {
    fn name(&self) -> &'static str {
        "build"
    }

    fn can_handle(&self, integration: &Integration) -> bool {
        integration.phase() == Some(IntegrationPhase::Building)
    }

    async fn handle(&self, integration: &Integration) -> Result<Reconciled, ActionError> {
        let identifier = decision::build_identifier(integration)?;
        let build = self.executor.builds().get(identifier).await?;
        let decision = decision::decide(integration, build.status)?;

        match &decision {
            Decision::RequestBuild(_) => tracing::info!(identifier, "requesting build"),
            Decision::MarkFailed(_) => tracing::warn!(
                identifier,
                error = build.error.as_deref().unwrap_or("unknown"),
                "build failed"
            ),
            Decision::MarkDeploying(_) => tracing::info!(identifier, "build completed"),
            Decision::Wait => tracing::debug!(identifier, "build running"),
        }

        match decision.into_effect() {
            Some(effect) => Ok(self.executor.execute(effect).await?.into()),
            None => Ok(Reconciled::Unchanged),
        }
    }
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
