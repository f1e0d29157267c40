// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build decision state machine
//!
//! Maps an integration in `Building` plus the oracle's status for its
//! identifier onto exactly one next step:
//!
//! | build status   | decision            | resource phase |
//! |----------------|---------------------|----------------|
//! | `NotRequested` | request a build     | `Building`     |
//! | `Error`        | mark failed         | `Error`        |
//! | `Completed`    | mark deploying      | `Deploying`    |
//! | `Running`      | wait                | `Building`     |

use crate::build::{BuildSource, BuildStatus};
use crate::effect::Effect;
use crate::integration::{Integration, IntegrationPhase};
use crate::operation::Operation;
use thiserror::Error;

/// The integration cannot be reconciled as submitted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("integration {name} has no source code")]
    MissingSource { name: String },
    #[error("integration {name} has no build identifier")]
    MissingIdentifier { name: String },
}

/// The single step to take for one observed build status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Submit the build; the resource itself is left untouched
    RequestBuild(BuildSource),
    /// Persist this copy, now in phase `Error`
    MarkFailed(Integration),
    /// Persist this copy, now in phase `Deploying`
    MarkDeploying(Integration),
    /// Build still running; check again on the next pass
    Wait,
}

impl Decision {
    /// The side effect that carries out this decision, if any
    pub fn into_effect(self) -> Option<Effect> {
        match self {
            Decision::RequestBuild(source) => Some(Effect::StartBuild { source }),
            Decision::MarkFailed(integration) | Decision::MarkDeploying(integration) => {
                Some(Effect::Persist {
                    operation: Operation::IntegrationUpdate { integration },
                })
            }
            Decision::Wait => None,
        }
    }
}

/// Identifier to look the integration's build up under
pub fn build_identifier(integration: &Integration) -> Result<&str, ValidationError> {
    let identifier = integration.status.identifier.as_str();
    if identifier.trim().is_empty() {
        return Err(ValidationError::MissingIdentifier {
            name: integration.name().to_string(),
        });
    }
    Ok(identifier)
}

/// Decide the next step for an integration given its current build status
///
/// Arms are listed in priority order; exactly one fires per call.
pub fn decide(integration: &Integration, status: BuildStatus) -> Result<Decision, ValidationError> {
    match status {
        BuildStatus::NotRequested => {
            let identifier = build_identifier(integration)?;
            let code = integration
                .source_code()
                .ok_or_else(|| ValidationError::MissingSource {
                    name: integration.name().to_string(),
                })?;
            Ok(Decision::RequestBuild(BuildSource {
                identifier: identifier.to_string(),
                code: code.to_string(),
            }))
        }
        BuildStatus::Error => Ok(Decision::MarkFailed(
            integration.with_phase(IntegrationPhase::Error),
        )),
        BuildStatus::Completed => Ok(Decision::MarkDeploying(
            integration.with_phase(IntegrationPhase::Deploying),
        )),
        BuildStatus::Running => Ok(Decision::Wait),
    }
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
