// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by e2e-report.

use camino::Utf8PathBuf;
use config::ConfigError;
use std::{error, fmt};
use thiserror::Error;

/// An error that occurred while reading or writing the persisted result store.
///
/// These errors are fatal to finalizing a run: results are never silently
/// dropped.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    /// The store file exists but could not be read.
    #[error("failed to read result store at `{path}`")]
    Read {
        /// The path that failed to be read.
        path: Utf8PathBuf,

        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// The store file could not be parsed as an array of outcome records.
    #[error("failed to parse result store at `{path}`")]
    Parse {
        /// The path that failed to be parsed.
        path: Utf8PathBuf,

        /// The underlying error, along with the JSON path of the offending value.
        #[source]
        error: serde_path_to_error::Error<serde_json::Error>,
    },

    /// The store file contained data after the record array.
    #[error("unexpected data after the record array in result store at `{path}`")]
    TrailingData {
        /// The path that failed to be parsed.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },

    /// The directory containing the store could not be created.
    #[error("failed to create directory `{path}` for result store")]
    CreateDir {
        /// The directory that failed to be created.
        path: Utf8PathBuf,

        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// The store could not be written.
    #[error("failed to write result store to `{path}`")]
    Write {
        /// The path that failed to be written.
        path: Utf8PathBuf,

        /// The underlying error. Serialization failures surface here as I/O errors.
        #[source]
        error: atomicwrites::Error<std::io::Error>,
    },
}

impl PersistenceError {
    /// Returns the store path this error refers to.
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::TrailingData { path, .. }
            | Self::CreateDir { path, .. }
            | Self::Write { path, .. } => path,
        }
    }
}

/// An error that occurred while reading a stream of reporter events.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EventStreamError {
    /// Reading from the underlying stream failed.
    #[error("failed to read event stream at line {line}")]
    Read {
        /// The 1-based line number at which the read failed.
        line: usize,

        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// A line could not be parsed as an event.
    #[error("failed to parse event at line {line}")]
    Parse {
        /// The 1-based line number of the malformed event.
        line: usize,

        /// The underlying deserialization error.
        #[source]
        error: serde_json::Error,
    },
}

/// A suite path was deeper than the maximum supported depth.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("suite path has {depth} levels, more than the maximum of {max}")]
pub struct SuitePathTooDeep {
    depth: usize,
    max: usize,
}

impl SuitePathTooDeep {
    pub(crate) fn new(depth: usize, max: usize) -> Self {
        Self { depth, max }
    }

    /// The depth of the rejected path.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The maximum supported depth.
    pub fn max(&self) -> usize {
        self.max
    }
}

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse e2e-report config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file that failed to parse.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error that occurred.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}

/// Displays an error along with each of its sources, one per line.
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: error::Error> DisplayErrorChain<E> {
    /// Creates a new error chain display.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: error::Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let mut current = self.error.source();
        while let Some(source) = current {
            write!(f, "\n  caused by: {source}")?;
            current = source.source();
        }

        Ok(())
    }
}
