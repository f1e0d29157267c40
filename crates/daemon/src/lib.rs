// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Kiln daemon library: configuration, startup and the reconcile pass

pub mod config;
pub mod inbox;
pub mod lifecycle;

pub use config::{Config, ConfigError, DEFAULT_RESYNC_INTERVAL};
pub use inbox::{intake, IntakeReport, Manifest};
pub use lifecycle::{startup, Daemon, DaemonBuilds, LifecycleError, PassReport};
