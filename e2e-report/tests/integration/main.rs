// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: event streams from several runs merged into one store.

mod fixtures;
mod multi_run;
