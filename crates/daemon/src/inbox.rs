// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest intake
//!
//! Integration manifests dropped into the inbox directory as `*.json` are
//! stored on the next pass. Accepted files are removed; files that cannot be
//! parsed or stored are renamed to `*.rejected` so they are not retried.

use kiln_core::Integration;
use kiln_engine::{ExecuteError, Runtime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    /// Pre-assigned build identifier; generated when absent
    #[serde(default)]
    pub identifier: Option<String>,
}

impl Manifest {
    pub fn into_integration(self) -> Integration {
        let mut integration = Integration::new(self.name, "");
        integration.spec.source.code = self.code;
        if let Some(identifier) = self.identifier {
            integration = integration.with_identifier(identifier);
        }
        integration
    }
}

#[derive(Debug, Error)]
enum Rejection {
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("manifest has an empty name")]
    EmptyName,
    #[error("{0}")]
    Store(#[from] ExecuteError),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IntakeReport {
    /// Names of integrations created
    pub accepted: Vec<String>,
    /// Manifests renamed to `*.rejected`
    pub rejected: Vec<PathBuf>,
}

/// Store every manifest waiting in `inbox`
///
/// A missing inbox directory is treated as empty.
pub fn intake(inbox: &Path, runtime: &Runtime) -> std::io::Result<IntakeReport> {
    let mut report = IntakeReport::default();

    let entries = match std::fs::read_dir(inbox) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(report),
        Err(e) => return Err(e),
    };

    let mut manifests: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    manifests.sort();

    for path in manifests {
        match accept(&path, runtime) {
            Ok(name) => {
                std::fs::remove_file(&path)?;
                tracing::info!(
                    integration = %name,
                    path = %path.display(),
                    "manifest accepted"
                );
                report.accepted.push(name);
            }
            Err(e) => {
                let rejected = path.with_extension("rejected");
                std::fs::rename(&path, &rejected)?;
                tracing::warn!(path = %path.display(), error = %e, "manifest rejected");
                report.rejected.push(rejected);
            }
        }
    }

    Ok(report)
}

fn accept(path: &Path, runtime: &Runtime) -> Result<String, Rejection> {
    let content = std::fs::read_to_string(path)?;
    let manifest: Manifest = serde_json::from_str(&content)?;
    if manifest.name.trim().is_empty() {
        return Err(Rejection::EmptyName);
    }
    let stored = runtime.submit(manifest.into_integration())?;
    Ok(stored.metadata.name)
}

#[cfg(test)]
#[path = "inbox_tests.rs"]
mod tests;
