// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable integration storage: a JSON-lines WAL plus the state it materializes

mod state;
mod store;
mod wal;

pub use state::{MaterializedState, StoreError};
pub use store::{CommitError, Store};
pub use wal::{Wal, WalError};
