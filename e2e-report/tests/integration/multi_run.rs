// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use camino_tempfile::Utf8TempDir;
use e2e_report::record::{Label, RecordStatus};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::fs;

const TITLE: &str = "should display title";
const NAVIGATE: &str = "should navigate to correct detail page when product was clicked";

fn name(title: &str) -> String {
    format!("Product master page {title}")
}

#[test]
fn first_run_creates_store() {
    let temp_dir = Utf8TempDir::new().unwrap();
    let config = config_for(temp_dir.path());

    let summary = run_session(
        &config,
        &[
            outcome_line(CHROME, TITLE, "passed", &["R-001"]),
            outcome_line(CHROME, NAVIGATE, "failed", &["R-001", "R-002"]),
            outcome_line(CHROME, "work in progress", "skipped", &[]),
            run_end_line(),
        ],
    );
    assert!(summary.created());
    assert_eq!(summary.total, 2);

    let records = load_store(&config);
    assert_eq!(
        summarize(&records),
        [
            (CHROME.to_owned(), name(TITLE), RecordStatus::Successful),
            (CHROME.to_owned(), name(NAVIGATE), RecordStatus::Failed),
        ]
    );
    assert_eq!(
        records[1].labels,
        [
            Label::tag(Some("R-001".to_owned())),
            Label::tag(Some("R-002".to_owned())),
        ]
    );
    assert_eq!(records[1].display_name, NAVIGATE);
    assert_eq!(records[1].end_time - records[1].start_time, 1500);
}

#[test]
fn later_runs_replace_rerun_tests_only() {
    let temp_dir = Utf8TempDir::new().unwrap();
    let config = config_for(temp_dir.path());

    run_session(
        &config,
        &[
            outcome_line(CHROME, TITLE, "passed", &[]),
            outcome_line(CHROME, NAVIGATE, "failed", &[]),
            run_end_line(),
        ],
    );

    // Only the failing test is re-run; the other one is skipped.
    let summary = run_session(
        &config,
        &[
            outcome_line(CHROME, TITLE, "skipped", &[]),
            outcome_line(CHROME, NAVIGATE, "passed", &[]),
            run_end_line(),
        ],
    );
    assert_eq!(summary.previous, Some(2));
    assert_eq!(summary.superseded(), 1);

    assert_eq!(
        summarize(&load_store(&config)),
        [
            (CHROME.to_owned(), name(TITLE), RecordStatus::Successful),
            (CHROME.to_owned(), name(NAVIGATE), RecordStatus::Successful),
        ]
    );

    // An empty run leaves history untouched.
    let before = fs::read_to_string(config.store_path()).unwrap();
    run_session(&config, &[run_end_line()]);
    assert_eq!(fs::read_to_string(config.store_path()).unwrap(), before);
}

// The qualified name does not include the environment, so the same test in
// two environments shares a name. A run that only covers one environment
// replaces the record of the other.
#[test]
fn environments_share_qualified_names() {
    let temp_dir = Utf8TempDir::new().unwrap();
    let config = config_for(temp_dir.path());

    run_session(
        &config,
        &[
            outcome_line(CHROME, TITLE, "passed", &[]),
            outcome_line(SAFARI, TITLE, "failed", &[]),
            run_end_line(),
        ],
    );
    assert_eq!(load_store(&config).len(), 2);

    run_session(
        &config,
        &[outcome_line(SAFARI, TITLE, "passed", &[]), run_end_line()],
    );
    assert_eq!(
        summarize(&load_store(&config)),
        [(SAFARI.to_owned(), name(TITLE), RecordStatus::Successful)]
    );
}

#[test]
fn configured_store_location_and_format() {
    let temp_dir = Utf8TempDir::new().unwrap();
    let config_dir = temp_dir.path().join(".config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("e2e-report.toml"),
        indoc! {r#"
            [store]
            path = "reports/results.json"
            pretty = true

            [[run.profiles]]
            name = "Desktop Chrome"
        "#},
    )
    .unwrap();
    let config = config_for(temp_dir.path());

    let summary = run_session(
        &config,
        &[outcome_line(CHROME, TITLE, "passed", &[]), run_end_line()],
    );
    assert_eq!(
        summary.store_path,
        temp_dir.path().join("reports/results.json")
    );

    let contents = fs::read_to_string(&summary.store_path).unwrap();
    assert!(contents.starts_with("[\n  {"), "pretty output: {contents}");
    assert_eq!(load_store(&config).len(), 1);
}
