// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `e2e-report` command-line tool.
//!
//! This crate is not meant to be used as a library: its API is unstable.

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputContext;
