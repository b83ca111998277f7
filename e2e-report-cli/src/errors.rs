// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use e2e_report::{
    errors::{ConfigParseError, ConfigParseErrorKind, EventStreamError, PersistenceError},
    exit_codes::ReportExitCode,
};
use std::error::Error;
use thiserror::Error;

/// An error that is reported to the user and causes a non-zero exit.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine current directory")]
    CurrentDirFailed {
        #[source]
        error: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 {
        #[source]
        error: camino::FromPathBufError,
    },
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        error: ConfigParseError,
    },
    #[error("failed to open event stream `{path}`")]
    EventStreamOpen {
        path: Utf8PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("event stream error")]
    EventStream {
        #[from]
        error: EventStreamError,
    },
    #[error("persistence error")]
    Persistence {
        #[from]
        error: PersistenceError,
    },
    #[error("current records not found at `{path}`")]
    CurrentRecordsNotFound { path: Utf8PathBuf },
    #[error("error writing output")]
    WriteOutput {
        #[source]
        error: std::io::Error,
    },
}

impl ExpectedError {
    pub(crate) fn write_output(error: std::io::Error) -> Self {
        Self::WriteOutput { error }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirFailed { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::ConfigParseError { .. } => ReportExitCode::SETUP_ERROR,
            Self::EventStreamOpen { .. } | Self::EventStream { .. } => {
                ReportExitCode::EVENT_STREAM_FAILED
            }
            Self::Persistence { .. } | Self::CurrentRecordsNotFound { .. } => {
                ReportExitCode::PERSISTENCE_FAILED
            }
            Self::WriteOutput { .. } => ReportExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self) {
        let mut next_error = match &self {
            Self::CurrentDirFailed { error } => {
                tracing::error!("could not determine current directory");
                Some(error as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { error } => {
                tracing::error!("current directory is not valid UTF-8");
                Some(error as &dyn Error)
            }
            Self::ConfigParseError { error } => {
                let config_file = error.config_file();
                match error.kind() {
                    ConfigParseErrorKind::BuildError(build_error) => {
                        tracing::error!("failed to parse e2e-report config at `{config_file}`");
                        Some(&**build_error as &dyn Error)
                    }
                    ConfigParseErrorKind::DeserializeError(de_error) => {
                        tracing::error!(
                            "failed to parse e2e-report config at `{config_file}`: \
                             invalid value for `{}`",
                            de_error.path()
                        );
                        Some(de_error.inner() as &dyn Error)
                    }
                    _ => {
                        tracing::error!("failed to parse e2e-report config at `{config_file}`");
                        error.source()
                    }
                }
            }
            Self::EventStreamOpen { path, error } => {
                tracing::error!("failed to open event stream `{path}`");
                Some(error as &dyn Error)
            }
            Self::EventStream { error } => {
                tracing::error!("{error}");
                error.source()
            }
            Self::Persistence { error } => {
                tracing::error!("{error}");
                error.source()
            }
            Self::CurrentRecordsNotFound { path } => {
                tracing::error!("current records not found at `{path}`");
                None
            }
            Self::WriteOutput { error } => {
                tracing::error!("error writing output");
                Some(error as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            tracing::error!(target: crate::output::NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
