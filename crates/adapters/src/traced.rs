// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::build::{BuildAdapter, BuildError, Submission};
use async_trait::async_trait;
use kiln_core::{BuildResult, BuildSource};
use tracing::Instrument;

/// Wrapper that adds tracing to any BuildAdapter
#[derive(Clone)]
pub struct TracedBuildAdapter<B> {
    inner: B,
}

impl<B> TracedBuildAdapter<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: BuildAdapter> BuildAdapter for TracedBuildAdapter<B> {
    async fn start(&self, source: BuildSource) -> Result<Submission, BuildError> {
        let span = tracing::info_span!("build.start", identifier = %source.identifier);

        // Precondition: identifier and payload must be present
        let rejected = span.in_scope(|| {
            tracing::info!(code_len = source.code.len(), "submitting");
            if source.identifier.trim().is_empty() {
                tracing::error!("empty build identifier");
                return Some(BuildError::InvalidRequest(
                    "empty build identifier".to_string(),
                ));
            }
            if source.code.is_empty() {
                tracing::error!("empty source payload");
                return Some(BuildError::InvalidRequest(format!(
                    "empty source payload for {}",
                    source.identifier
                )));
            }
            None
        });
        if let Some(e) = rejected {
            return Err(e);
        }

        let start = std::time::Instant::now();
        let result = self.inner.start(source).instrument(span.clone()).await;
        let elapsed = start.elapsed();

        span.in_scope(|| match &result {
            Ok(Submission::Enqueued) => tracing::info!(
                elapsed_ms = elapsed.as_millis() as u64,
                "build enqueued"
            ),
            Ok(Submission::AlreadySubmitted(status)) => tracing::info!(
                elapsed_ms = elapsed.as_millis() as u64,
                %status,
                "build already submitted"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "submit failed"
            ),
        });

        result
    }

    async fn get(&self, identifier: &str) -> Result<BuildResult, BuildError> {
        let result = self.inner.get(identifier).await;
        match &result {
            Ok(r) => tracing::trace!(identifier, status = %r.status, "checked"),
            Err(e) => tracing::warn!(identifier, error = %e, "status lookup failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
