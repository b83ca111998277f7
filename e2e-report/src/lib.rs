// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for aggregating end-to-end test outcomes across runs.
//!
//! An external test engine reports one outcome per finished test. A
//! [`ResultAggregator`](aggregator::ResultAggregator) buffers those outcomes as
//! [`OutcomeRecord`](record::OutcomeRecord)s, and at the end of the run merges
//! them into the persisted [`ResultStore`](store::ResultStore):
//!
//! * tests that were not re-run keep their previous record,
//! * tests that were re-run are replaced by their latest outcome,
//! * skipped tests never touch history.
//!
//! Test identities are derived from the suite hierarchy by the functions in
//! [`naming`].

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod events;
pub mod exit_codes;
pub mod merge;
pub mod naming;
pub mod record;
pub mod store;
pub mod suite;
