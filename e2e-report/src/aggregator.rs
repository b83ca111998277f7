// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregates test outcomes over a run, then merges them into the store.
//!
//! A [`ResultAggregator`] is constructed fresh for every run. It buffers one
//! [`OutcomeRecord`] per finished, non-skipped test, and is consumed by
//! [`ResultAggregator::finalize`] once the run ends.

use crate::{
    config::ReportConfig,
    errors::{EventStreamError, PersistenceError},
    events::{ReporterEvent, TestResult},
    merge::merge_records,
    record::OutcomeRecord,
    store::ResultStore,
    suite::TestCase,
};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeSet;

/// Buffers the outcomes of a run and persists them when the run ends.
#[derive(Debug)]
pub struct ResultAggregator {
    store: ResultStore,
    records: Vec<OutcomeRecord>,
    known_environments: Option<BTreeSet<String>>,
}

impl ResultAggregator {
    /// Creates a new aggregator that persists into the given store.
    pub fn new(store: ResultStore) -> Self {
        Self {
            store,
            records: Vec::new(),
            known_environments: None,
        }
    }

    /// Creates a new aggregator from the given config, optionally overriding
    /// the store path.
    pub fn from_config(config: &ReportConfig, store_override: Option<&Utf8Path>) -> Self {
        let mut aggregator = Self::new(config.result_store(store_override));
        if let Some(environments) = config.run().known_environments() {
            aggregator.set_known_environments(environments);
        }
        aggregator
    }

    /// Sets the environments outcomes are expected for. Outcomes recorded for
    /// other environments produce a warning, but are still recorded.
    pub fn set_known_environments<I, S>(&mut self, environments: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_environments = Some(environments.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the store this aggregator persists into.
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Returns the records buffered so far, in the order they were recorded.
    pub fn records(&self) -> &[OutcomeRecord] {
        &self.records
    }

    /// Records the outcome of a finished test.
    ///
    /// Skipped tests are ignored. Otherwise a record is appended to the
    /// buffer, even if the same test was already recorded during this run.
    pub fn record_outcome(&mut self, test: &TestCase, result: &TestResult) {
        let Some(record) = OutcomeRecord::from_outcome(test, result) else {
            tracing::debug!(id = %test.id, title = %test.title, "skipped test not recorded");
            return;
        };

        if let Some(known) = &self.known_environments
            && !known.contains(&record.environment)
        {
            tracing::warn!(
                "test `{}` ran in environment `{}`, which is not a configured profile",
                record.qualified_name(),
                record.environment,
            );
        }

        tracing::debug!(
            id = %record.id,
            name = %record.qualified_name(),
            status = %record.status,
            "recorded outcome",
        );
        self.records.push(record);
    }

    /// Records outcomes from a stream of events, stopping at the end of the
    /// run.
    ///
    /// Events after the end of the run are counted and ignored.
    pub fn record_events<I>(&mut self, events: I) -> Result<RecordEventsSummary, EventStreamError>
    where
        I: IntoIterator<Item = Result<ReporterEvent, EventStreamError>>,
    {
        let mut summary = RecordEventsSummary::default();
        for event in events {
            match event? {
                ReporterEvent::TestOutcome { .. } if summary.run_ended => {
                    summary.ignored_after_end += 1;
                }
                ReporterEvent::TestOutcome { test, result } => {
                    summary.outcomes += 1;
                    self.record_outcome(&test, &result);
                }
                ReporterEvent::RunEnd { .. } if summary.run_ended => {
                    summary.ignored_after_end += 1;
                }
                ReporterEvent::RunEnd { status } => {
                    tracing::debug!(?status, "run ended");
                    summary.run_ended = true;
                }
            }
        }

        Ok(summary)
    }

    /// Merges the buffered records into the store and writes it back.
    ///
    /// If the store does not exist yet, the buffered records are written as
    /// is. On error, the store is left as it was.
    pub fn finalize(self) -> Result<FinalizeSummary, PersistenceError> {
        let recorded = self.records.len();
        let store_path = self.store.path().to_owned();

        let (records, previous) = match self.store.load()? {
            Some(previous) => {
                let previous_count = previous.len();
                (merge_records(previous, self.records), Some(previous_count))
            }
            None => (self.records, None),
        };

        self.store.save(&records)?;

        let summary = FinalizeSummary {
            store_path,
            previous,
            recorded,
            total: records.len(),
        };
        match summary.previous {
            Some(previous) => tracing::info!(
                path = %summary.store_path,
                previous,
                recorded,
                superseded = summary.superseded(),
                total = summary.total,
                "merged outcomes into result store",
            ),
            None => tracing::info!(
                path = %summary.store_path,
                recorded,
                "created result store",
            ),
        }

        Ok(summary)
    }
}

/// Returned by [`ResultAggregator::record_events`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordEventsSummary {
    /// The number of test outcome events processed, skipped tests included.
    pub outcomes: usize,

    /// Whether the end of the run was reported.
    pub run_ended: bool,

    /// The number of events that arrived after the end of the run.
    pub ignored_after_end: usize,
}

/// Returned by [`ResultAggregator::finalize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalizeSummary {
    /// The path the store was written to.
    pub store_path: Utf8PathBuf,

    /// The number of records in the store before this run, or `None` if the
    /// store was created by this run.
    pub previous: Option<usize>,

    /// The number of records produced by this run.
    pub recorded: usize,

    /// The number of records in the store after this run.
    pub total: usize,
}

impl FinalizeSummary {
    /// Returns true if the store did not exist before this run.
    pub fn created(&self) -> bool {
        self.previous.is_none()
    }

    /// Returns the number of previous records replaced by records from this
    /// run.
    pub fn superseded(&self) -> usize {
        (self.previous.unwrap_or(0) + self.recorded).saturating_sub(self.total)
    }
}
