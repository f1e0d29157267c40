// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, passes, shutdown.

use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use fs2::FileExt;
use kiln_adapters::{LocalBuildManager, NoOpBuildRunner, TracedBuildAdapter};
use kiln_core::UuidIdGen;
use kiln_engine::{ResyncReport, Runtime};
use kiln_storage::{Store, WalError};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, ConfigError};
use crate::inbox::{self, IntakeReport};

/// Build oracle used by the daemon (wrapped with tracing)
pub type DaemonBuilds = TracedBuildAdapter<LocalBuildManager<NoOpBuildRunner>>;

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("WAL error: {0}")]
    Wal(#[from] WalError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one daemon pass
#[derive(Debug, Default)]
pub struct PassReport {
    pub intake: IntakeReport,
    pub resync: ResyncReport,
}

/// Daemon state during operation
pub struct Daemon {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub runtime: Runtime,
    pub start_time: Instant,
}

impl Daemon {
    /// Take in new manifests, then reconcile everything once
    pub async fn run_pass(&self) -> PassReport {
        let intake = match inbox::intake(&self.config.inbox_path, &self.runtime) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "manifest intake failed");
                IntakeReport::default()
            }
        };
        let resync = self.runtime.resync().await;

        if !intake.accepted.is_empty() || resync.updated > 0 || resync.failed > 0 {
            info!(
                accepted = intake.accepted.len(),
                rejected = intake.rejected.len(),
                scanned = resync.scanned,
                submitted = resync.submitted,
                updated = resync.updated,
                failed = resync.failed,
                "pass complete"
            );
        }

        PassReport { intake, resync }
    }

    /// Shutdown the daemon gracefully
    pub fn shutdown(&mut self) {
        info!("Shutting down daemon...");

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // Lock is released when self.lock_file is dropped
        info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
    }
}

/// Start the daemon
pub fn startup(config: &Config) -> Result<Daemon, LifecycleError> {
    // 1. Create state directory
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire lock file FIRST - prevents two daemons sharing a WAL
    let mut lock_file = File::create(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;
    {
        use std::io::Write;
        writeln!(lock_file, "{}", std::process::id())?;
    }

    // 3. Create directories
    if let Some(parent) = config.wal_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::create_dir_all(&config.inbox_path)?;

    // 4. Load state from WAL
    let store = Store::open(&config.wal_path)?;
    info!(
        integrations = store.state().integrations.len(),
        seq = store.sequence(),
        "Loaded state"
    );

    // 5. Set up the build oracle
    let builds: DaemonBuilds = TracedBuildAdapter::new(
        LocalBuildManager::new(NoOpBuildRunner::new()).with_timeout(config.build_timeout),
    );
    match config.build_timeout {
        Some(timeout) => info!(?timeout, "build timeout enabled"),
        None => info!("build timeout disabled"),
    }

    // 6. Create runtime
    let runtime = Runtime::standard(builds, UuidIdGen, Arc::new(Mutex::new(store)));

    info!(state_dir = %config.state_dir.display(), "Daemon started");

    Ok(Daemon {
        config: config.clone(),
        lock_file,
        runtime,
        start_time: Instant::now(),
    })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
