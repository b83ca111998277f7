// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events reported by the test engine.
//!
//! The engine reports one [`ReporterEvent::TestOutcome`] per finished test and
//! a single [`ReporterEvent::RunEnd`] once all tests are done. Out of process,
//! these events are exchanged as JSON lines, read with [`EventReader`]:
//!
//! ```text
//! {"type":"test-outcome","test":{"id":"a1","title":"t","suitePath":["","Desktop Chrome","app.spec.ts"]},"result":{"status":"passed","startTime":"2024-03-01T10:00:00Z","duration":12}}
//! {"type":"run-end","status":"passed"}
//! ```

use crate::{errors::EventStreamError, suite::TestCase};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// A single event reported by the test engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReporterEvent {
    /// A test finished.
    TestOutcome {
        /// The test that finished.
        test: TestCase,

        /// The result of the test.
        result: TestResult,
    },

    /// The run finished. Sent once, after all tests.
    RunEnd {
        /// The overall status of the run as reported by the engine.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<String>,
    },
}

/// The result of executing a single test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// The status of the test.
    pub status: TestStatus,

    /// The time at which the test started.
    pub start_time: DateTime<FixedOffset>,

    /// How long the test took, in milliseconds.
    pub duration: i64,
}

/// The status of a finished test, as reported by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestStatus {
    /// The test passed.
    Passed,

    /// The test failed.
    Failed,

    /// The test exceeded its timeout.
    TimedOut,

    /// The test was skipped.
    Skipped,

    /// The test was interrupted, e.g. because the run was cancelled.
    Interrupted,

    /// A status not known to this version of e2e-report.
    #[serde(other)]
    Unknown,
}

impl TestStatus {
    /// Returns true if the test was skipped.
    pub fn is_skipped(self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Reads [`ReporterEvent`]s from a stream of JSON lines.
///
/// Blank lines are ignored. Errors carry the 1-based line number at which
/// they occurred.
#[derive(Debug)]
pub struct EventReader<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> EventReader<R> {
    /// Creates a new event reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Returns the number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    /// Reads the next event, or returns `None` at the end of the stream.
    pub fn next_event(&mut self) -> Option<Result<ReporterEvent, EventStreamError>> {
        loop {
            self.buf.clear();
            self.line += 1;
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => {
                    self.line -= 1;
                    return None;
                }
                Ok(_) => {}
                Err(error) => {
                    return Some(Err(EventStreamError::Read {
                        line: self.line,
                        error,
                    }));
                }
            }

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }

            return Some(serde_json::from_str(line).map_err(|error| {
                EventStreamError::Parse {
                    line: self.line,
                    error,
                }
            }));
        }
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<ReporterEvent, EventStreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}
