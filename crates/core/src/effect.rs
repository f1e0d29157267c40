// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects requested by the decision state machine

use crate::build::BuildSource;
use crate::operation::Operation;
use crate::traced::TracedEffect;

/// Side effects the engine executes on behalf of the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Submit a build to the oracle
    StartBuild { source: BuildSource },
    /// Persist a resource change (conditional on its resource version)
    Persist { operation: Operation },
}

impl TracedEffect for Effect {
    fn name(&self) -> &'static str {
        match self {
            Effect::StartBuild { .. } => "start_build",
            Effect::Persist { .. } => "persist",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::StartBuild { source } => vec![
                ("identifier", source.identifier.clone()),
                ("code_len", source.code.len().to_string()),
            ],
            Effect::Persist { operation } => {
                let mut fields = vec![
                    ("operation", operation.name().to_string()),
                    ("integration", operation.integration_name().to_string()),
                ];
                if let Some(integration) = operation.integration() {
                    fields.push((
                        "resource_version",
                        integration.metadata.resource_version.to_string(),
                    ));
                    if let Some(phase) = integration.phase() {
                        fields.push(("phase", phase.to_string()));
                    }
                }
                fields
            }
        }
    }
}
