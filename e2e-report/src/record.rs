// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome records, the unit of the persisted result store.

use crate::{
    events::{TestResult, TestStatus},
    naming,
    suite::TestCase,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of one completed, non-skipped test.
///
/// The serialized form uses the field names consumed by downstream tooling.
/// `className` and `methodName` both hold the qualified name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRecord {
    /// Identifier assigned by the test engine, stable across runs.
    pub id: String,

    /// The qualified name. Used as the de-duplication key.
    pub class_name: String,

    /// The qualified name again.
    pub method_name: String,

    /// The test's own title.
    pub display_name: String,

    /// One label per requirement annotation on the test, in order.
    pub labels: Vec<Label>,

    /// Start time in milliseconds since the Unix epoch.
    pub start_time: i64,

    /// End time in milliseconds since the Unix epoch.
    pub end_time: i64,

    /// The outcome.
    pub status: RecordStatus,

    /// The environment the test ran in.
    pub environment: String,
}

impl OutcomeRecord {
    /// Builds a record for a finished test.
    ///
    /// Returns `None` if the test was skipped: skipped tests are never
    /// recorded.
    pub fn from_outcome(test: &TestCase, result: &TestResult) -> Option<Self> {
        if result.status.is_skipped() {
            return None;
        }

        let qualified_name = naming::full_test_name(test);
        let start_time = result.start_time.timestamp_millis();
        let labels = test
            .annotations
            .iter()
            .filter(|annotation| annotation.is_requirement())
            .map(|annotation| Label::tag(annotation.description.clone()))
            .collect();

        Some(Self {
            id: test.id.clone(),
            class_name: qualified_name.clone(),
            method_name: qualified_name,
            display_name: test.title.clone(),
            labels,
            start_time,
            end_time: start_time.saturating_add(result.duration),
            status: RecordStatus::from_test_status(result.status),
            environment: naming::test_environment(test).to_owned(),
        })
    }

    /// Returns the qualified name of the test: the suite path followed by
    /// the test title.
    pub fn qualified_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the duration of the test in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.end_time.saturating_sub(self.start_time)
    }
}

/// A `(name, value)` pair attached to a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// The label name. Always [`Label::TAG`] for labels produced here.
    pub name: String,

    /// The label value. Absent if the originating annotation had no
    /// description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Label {
    /// The name used for requirement labels.
    pub const TAG: &'static str = "tag";

    /// Creates a requirement tag label.
    pub fn tag(value: Option<String>) -> Self {
        Self {
            name: Self::TAG.to_owned(),
            value,
        }
    }
}

/// The status of a recorded test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    /// The test passed.
    Successful,

    /// The test failed, timed out, or was interrupted.
    Failed,

    /// The test was skipped.
    ///
    /// Never produced by this crate, but accepted from record files written
    /// by other tools so that merging can discard it.
    #[serde(alias = "skipped")]
    Skipped,
}

impl RecordStatus {
    /// Maps an engine status to a record status.
    pub fn from_test_status(status: TestStatus) -> Self {
        match status {
            TestStatus::Passed => Self::Successful,
            TestStatus::Skipped => Self::Skipped,
            TestStatus::Failed
            | TestStatus::TimedOut
            | TestStatus::Interrupted
            | TestStatus::Unknown => Self::Failed,
        }
    }

    /// Returns true if this status is [`RecordStatus::Skipped`].
    pub fn is_skipped(self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Returns the serialized name of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Successful => "SUCCESSFUL",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
