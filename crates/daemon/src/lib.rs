// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Meeting recorder daemon library
//!
//! Exposes the IPC protocol and client, plus the pieces `mbd` is built from
//! so they can be driven in-process.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod client;
pub mod env;
pub mod lifecycle;
pub mod listener;
pub mod protocol;

pub use client::{ClientError, DaemonClient};
pub use lifecycle::{startup, Config, DaemonState, LifecycleError, StartupResult};
pub use listener::{ListenCtx, Listener};
pub use protocol::{ErrorKind, Request, Response};
