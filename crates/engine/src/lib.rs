// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Kiln reconciliation engine

mod actions;
mod error;
mod executor;
mod runtime;

pub use actions::{Action, BuildAction, InitializeAction, Reconciled};
pub use error::ActionError;
pub use executor::{ExecuteError, Executor, Outcome};
pub use runtime::{ResyncReport, Runtime};
