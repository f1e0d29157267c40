// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kiln-core: Core library for the kiln integration build reconciler
//!
//! This crate provides:
//! - The integration resource model and its lifecycle phases
//! - Build status types shared with the build oracle
//! - The pure build decision state machine
//! - Effects and persisted operations consumed by the engine

pub mod clock;
pub mod id;

pub mod build;
pub mod decision;
pub mod effect;
pub mod integration;
pub mod operation;
pub mod traced;

// Re-exports
pub use build::{BuildResult, BuildSource, BuildStatus};
pub use clock::{Clock, FakeClock, SystemClock};
pub use decision::{decide, Decision, ValidationError};
pub use effect::Effect;
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use integration::{
    Integration, IntegrationPhase, IntegrationSpec, IntegrationStatus, ObjectMeta, SourceSpec,
};
pub use operation::Operation;
pub use traced::TracedEffect;
