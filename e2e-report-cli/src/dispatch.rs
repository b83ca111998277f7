// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError,
    output::{OutputContext, OutputOpts, StdoutStyles},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use e2e_report::{
    aggregator::ResultAggregator,
    config::ReportConfig,
    events::EventReader,
    exit_codes::ReportExitCode,
    merge::merge_records,
    record::{Label, OutcomeRecord, RecordStatus},
};
use indexmap::IndexMap;
use owo_colors::OwoColorize;
use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufReader, Write},
};

/// Aggregates end-to-end test outcomes into a persistent result file.
///
/// Each run replaces the records of the tests it re-ran and keeps everything
/// else, so the result file always reflects the latest outcome of every test.
#[derive(Debug, Parser)]
#[command(version, name = "e2e-report")]
pub struct E2eReportApp {
    #[command(flatten)]
    config_opts: ConfigOpts,

    #[command(flatten)]
    output: OutputOpts,

    #[command(subcommand)]
    command: Command,
}

impl E2eReportApp {
    /// Initializes the output context, installing the logger.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, writing command output to `writer`.
    ///
    /// Returns the exit code for the process.
    pub fn exec(self, output: OutputContext, writer: &mut dyn Write) -> Result<i32, ExpectedError> {
        let config = self.config_opts.make_config()?;
        let store_override = self.config_opts.store.as_deref();

        match self.command {
            Command::Ingest { events } => {
                exec_ingest(&config, store_override, events.as_deref(), writer)
            }
            Command::Merge {
                previous,
                current,
                output: merged,
            } => exec_merge(&config, &previous, &current, merged.as_deref(), writer),
            Command::Show { environment } => exec_show(
                &config,
                store_override,
                environment.as_deref(),
                output,
                writer,
            ),
            Command::ShowConfig => exec_show_config(&config, store_override, output, writer),
        }?;

        Ok(ReportExitCode::OK)
    }
}

#[derive(Debug, Args)]
struct ConfigOpts {
    /// Directory relative paths are resolved against [default: current directory]
    #[arg(long, global = true, value_name = "DIR")]
    workspace_root: Option<Utf8PathBuf>,

    /// Config file [default: workspace-root/.config/e2e-report.toml]
    #[arg(long, global = true, value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,

    /// Result store, overriding the configured `store.path`
    #[arg(long, global = true, value_name = "PATH", env = "E2E_REPORT_STORE")]
    store: Option<Utf8PathBuf>,
}

impl ConfigOpts {
    fn make_config(&self) -> Result<ReportConfig, ExpectedError> {
        let workspace_root = match &self.workspace_root {
            Some(root) => root.clone(),
            None => current_dir()?,
        };

        let config = ReportConfig::from_sources(
            workspace_root,
            self.config_file.as_deref(),
            warn_unknown_keys,
        )?;
        Ok(config)
    }
}

fn current_dir() -> Result<Utf8PathBuf, ExpectedError> {
    let dir =
        std::env::current_dir().map_err(|error| ExpectedError::CurrentDirFailed { error })?;
    Utf8PathBuf::try_from(dir).map_err(|error| ExpectedError::CurrentDirInvalidUtf8 { error })
}

fn warn_unknown_keys(config_file: &Utf8Path, unknown: &BTreeSet<String>) {
    let keys = unknown
        .iter()
        .map(|key| format!("`{key}`"))
        .collect::<Vec<_>>()
        .join(", ");
    tracing::warn!("ignoring unknown configuration keys in `{config_file}`: {keys}");
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record a run's outcomes from a JSON-lines event stream
    ///
    /// Each line is a `test-outcome` or `run-end` event. Once the stream
    /// ends, the outcomes are merged into the result store.
    Ingest {
        /// Event stream to read [default: standard input]
        #[arg(long, value_name = "PATH")]
        events: Option<Utf8PathBuf>,
    },

    /// Merge two record files
    ///
    /// Records in the current file replace records of the same test in the
    /// previous file. Skipped records in the current file are dropped.
    Merge {
        /// Records from earlier runs. A missing file counts as empty
        #[arg(long, value_name = "PATH")]
        previous: Utf8PathBuf,

        /// Records from the latest run
        #[arg(long, value_name = "PATH")]
        current: Utf8PathBuf,

        /// Where to write the merged records [default: the previous file]
        #[arg(long, value_name = "PATH")]
        output: Option<Utf8PathBuf>,
    },

    /// Show the contents of the result store, grouped by environment
    Show {
        /// Only show records for this environment
        #[arg(long, value_name = "NAME")]
        environment: Option<String>,
    },

    /// Show the resolved configuration
    ShowConfig,
}

fn exec_ingest(
    config: &ReportConfig,
    store_override: Option<&Utf8Path>,
    events: Option<&Utf8Path>,
    writer: &mut dyn Write,
) -> Result<(), ExpectedError> {
    let mut aggregator = ResultAggregator::from_config(config, store_override);

    let summary = match events {
        Some(path) => {
            let file = File::open(path).map_err(|error| ExpectedError::EventStreamOpen {
                path: path.to_owned(),
                error,
            })?;
            aggregator.record_events(EventReader::new(BufReader::new(file)))?
        }
        None => aggregator.record_events(EventReader::new(std::io::stdin().lock()))?,
    };

    if !summary.run_ended {
        tracing::warn!("event stream ended without a run-end event, saving outcomes anyway");
    }
    if summary.ignored_after_end > 0 {
        tracing::warn!(
            "ignored {} events received after the end of the run",
            summary.ignored_after_end
        );
    }

    let finalized = aggregator.finalize()?;
    let result = if finalized.created() {
        writeln!(
            writer,
            "recorded {} outcomes into new result store `{}`",
            finalized.recorded, finalized.store_path,
        )
    } else {
        writeln!(
            writer,
            "recorded {} outcomes into `{}` ({} replaced, {} total)",
            finalized.recorded,
            finalized.store_path,
            finalized.superseded(),
            finalized.total,
        )
    };
    result.map_err(ExpectedError::write_output)
}

fn exec_merge(
    config: &ReportConfig,
    previous: &Utf8Path,
    current: &Utf8Path,
    output: Option<&Utf8Path>,
    writer: &mut dyn Write,
) -> Result<(), ExpectedError> {
    let current_store = config.result_store(Some(current));
    let current_records =
        current_store
            .load()?
            .ok_or_else(|| ExpectedError::CurrentRecordsNotFound {
                path: current_store.path().to_owned(),
            })?;

    let previous_store = config.result_store(Some(previous));
    let previous_records = previous_store.load()?.unwrap_or_default();

    let previous_count = previous_records.len();
    let merged = merge_records(previous_records, current_records);

    let output_store = match output {
        Some(path) => config.result_store(Some(path)),
        None => previous_store,
    };
    output_store.save(&merged)?;
    tracing::debug!(path = %output_store.path(), previous_count, "wrote merged records");

    writeln!(
        writer,
        "merged {} records into `{}` ({} previously)",
        merged.len(),
        output_store.path(),
        previous_count,
    )
    .map_err(ExpectedError::write_output)
}

fn exec_show(
    config: &ReportConfig,
    store_override: Option<&Utf8Path>,
    environment: Option<&str>,
    output: OutputContext,
    writer: &mut dyn Write,
) -> Result<(), ExpectedError> {
    let store = config.result_store(store_override);
    let Some(records) = store.load()? else {
        tracing::info!("no results recorded yet at `{}`", store.path());
        return Ok(());
    };

    let mut by_environment: IndexMap<&str, Vec<&OutcomeRecord>> = IndexMap::new();
    for record in &records {
        if environment.is_some_and(|env| env != record.environment) {
            continue;
        }
        by_environment
            .entry(record.environment.as_str())
            .or_default()
            .push(record);
    }

    if by_environment.is_empty() {
        match environment {
            Some(environment) => {
                tracing::info!("no results recorded for environment `{environment}`")
            }
            None => tracing::info!("result store `{}` is empty", store.path()),
        }
        return Ok(());
    }

    let styles = output.stdout_styles();
    write_environments(&by_environment, &styles, writer).map_err(ExpectedError::write_output)
}

fn write_environments(
    by_environment: &IndexMap<&str, Vec<&OutcomeRecord>>,
    styles: &StdoutStyles,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    for (environment, records) in by_environment {
        let passed = count_status(records, RecordStatus::Successful);
        let failed = count_status(records, RecordStatus::Failed);
        writeln!(
            writer,
            "{}: {} passed, {} failed",
            environment.style(styles.bold),
            passed.style(styles.pass),
            failed.style(styles.fail),
        )?;

        for record in records {
            let status = match record.status {
                RecordStatus::Successful => "PASS".style(styles.pass),
                RecordStatus::Failed => "FAIL".style(styles.fail),
                RecordStatus::Skipped => "SKIP".style(styles.skip),
            };
            write!(writer, "  {status} {}", record.qualified_name())?;

            let tags: Vec<_> = record
                .labels
                .iter()
                .filter(|label| label.name == Label::TAG)
                .filter_map(|label| label.value.as_deref())
                .collect();
            if !tags.is_empty() {
                write!(writer, " [{}]", tags.join(", ").style(styles.tag))?;
            }
            writeln!(writer)?;
        }
    }

    Ok(())
}

fn count_status(records: &[&OutcomeRecord], status: RecordStatus) -> usize {
    records.iter().filter(|r| r.status == status).count()
}

fn exec_show_config(
    config: &ReportConfig,
    store_override: Option<&Utf8Path>,
    output: OutputContext,
    writer: &mut dyn Write,
) -> Result<(), ExpectedError> {
    let styles = output.stdout_styles();
    let store = config.result_store(store_override);
    let run = config.run();

    let mut write = || -> std::io::Result<()> {
        if output.verbose {
            writeln!(writer, "workspace-root: {}", config.workspace_root())?;
        }
        writeln!(writer, "{}", "store".style(styles.bold))?;
        writeln!(writer, "  path: {}", store.path())?;
        writeln!(writer, "  pretty: {}", config.store_pretty())?;

        writeln!(writer, "{}", "run".style(styles.bold))?;
        if let Some(base_url) = &run.base_url {
            writeln!(writer, "  base-url: {base_url}")?;
        }
        writeln!(writer, "  headless: {}", run.headless)?;
        if run.profiles.is_empty() {
            writeln!(writer, "  profiles: (none)")?;
        } else {
            writeln!(writer, "  profiles:")?;
        }
        for profile in &run.profiles {
            write!(writer, "    {}", profile.name.style(styles.tag))?;
            if let Some(device) = &profile.device {
                write!(writer, " (device: {device})")?;
            }
            if let Some(viewport) = &profile.viewport {
                write!(writer, " (viewport: {viewport})")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    };

    write().map_err(ExpectedError::write_output)
}
