// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merging the records of a run into previously persisted records.

use crate::record::OutcomeRecord;
use std::collections::HashSet;

/// Merges the records produced by the current run into the previously
/// persisted records.
///
/// * Skipped records in `current` are discarded.
/// * A previous record is kept unless `current` has a record with the same
///   qualified name.
/// * The result is the kept previous records followed by the current
///   records, each in their original order.
///
/// Records in `current` are not de-duplicated against each other: if the same
/// test was recorded twice in one run, both records are kept.
pub fn merge_records(
    previous: Vec<OutcomeRecord>,
    current: Vec<OutcomeRecord>,
) -> Vec<OutcomeRecord> {
    let current: Vec<_> = current
        .into_iter()
        .filter(|record| !record.status.is_skipped())
        .collect();

    let mut merged: Vec<_> = {
        let rerun: HashSet<&str> = current.iter().map(|r| r.qualified_name()).collect();
        previous
            .into_iter()
            .filter(|record| !rerun.contains(record.qualified_name()))
            .collect()
    };
    merged.extend(current);
    merged
}
