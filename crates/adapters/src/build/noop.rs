// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op build runner for deployments without a build backend.

use super::{BuildError, BuildRunner};
use async_trait::async_trait;
use kiln_core::BuildSource;

/// Build runner that succeeds immediately.
///
/// Every submitted build moves straight to `Completed`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpBuildRunner;

impl NoOpBuildRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BuildRunner for NoOpBuildRunner {
    async fn run(&self, _source: &BuildSource) -> Result<(), BuildError> {
        Ok(())
    }
}
