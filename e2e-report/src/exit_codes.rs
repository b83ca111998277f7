// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Documented exit codes for the `e2e-report` command-line tool.

/// Documented exit codes for `e2e-report` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum ReportExitCode {}

impl ReportExitCode {
    /// No errors occurred and e2e-report exited normally.
    pub const OK: i32 = 0;

    /// The event stream could not be read or contained a malformed event.
    pub const EVENT_STREAM_FAILED: i32 = 104;

    /// The result store could not be read, parsed or written.
    pub const PERSISTENCE_FAILED: i32 = 105;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;

    /// A user issue happened while setting up an e2e-report invocation, e.g.
    /// an invalid config file.
    pub const SETUP_ERROR: i32 = 96;
}
