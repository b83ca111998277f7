// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8Path;
use e2e_report::{
    aggregator::{FinalizeSummary, ResultAggregator},
    config::ReportConfig,
    events::EventReader,
    record::{OutcomeRecord, RecordStatus},
};
use serde_json::json;

pub(crate) const CHROME: &str = "Desktop Chrome";
pub(crate) const SAFARI: &str = "Desktop Safari";

/// Builds a `test-outcome` event line for a test in the product master page
/// describe block.
pub(crate) fn outcome_line(
    environment: &str,
    title: &str,
    status: &str,
    requirements: &[&str],
) -> String {
    let annotations: Vec<_> = requirements
        .iter()
        .map(|r| json!({ "type": "Requirement", "description": r }))
        .collect();
    json!({
        "type": "test-outcome",
        "test": {
            "id": format!("{environment}-{title}"),
            "title": title,
            "suitePath": ["", environment, "app.spec.ts", "Product master page"],
            "annotations": annotations,
        },
        "result": {
            "status": status,
            "startTime": "2024-03-01T10:00:00.000Z",
            "duration": 1500,
        },
    })
    .to_string()
}

pub(crate) fn run_end_line() -> String {
    json!({ "type": "run-end", "status": "passed" }).to_string()
}

/// Runs a single reporter session over the given event lines.
pub(crate) fn run_session(config: &ReportConfig, lines: &[String]) -> FinalizeSummary {
    let input = lines.join("\n");
    let mut aggregator = ResultAggregator::from_config(config, None);
    let summary = aggregator
        .record_events(EventReader::new(input.as_bytes()))
        .expect("event stream is valid");
    assert!(summary.run_ended, "fixture streams always end the run");
    aggregator.finalize().expect("store is writable")
}

pub(crate) fn load_store(config: &ReportConfig) -> Vec<OutcomeRecord> {
    config
        .result_store(None)
        .load()
        .expect("store is readable")
        .expect("store exists")
}

pub(crate) fn summarize(records: &[OutcomeRecord]) -> Vec<(String, String, RecordStatus)> {
    records
        .iter()
        .map(|r| {
            (
                r.environment.clone(),
                r.qualified_name().to_owned(),
                r.status,
            )
        })
        .collect()
}

pub(crate) fn config_for(workspace_root: &Utf8Path) -> ReportConfig {
    ReportConfig::from_sources(workspace_root, None, |file, unknown| {
        panic!("unknown keys in {file}: {unknown:?}")
    })
    .expect("config is valid")
}
