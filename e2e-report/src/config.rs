// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for e2e-report.
//!
//! Configuration is layered: the embedded [`ReportConfig::DEFAULT_CONFIG`]
//! first, then either `.config/e2e-report.toml` under the workspace root (if
//! present) or an explicitly provided config file.

use crate::{
    errors::{ConfigParseError, ConfigParseErrorKind},
    store::ResultStore,
};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::{collections::BTreeSet, fmt};

/// Overall configuration for e2e-report.
#[derive(Clone, Debug)]
pub struct ReportConfig {
    workspace_root: Utf8PathBuf,
    inner: ReportConfigImpl,
}

impl ReportConfig {
    /// The default location of the config within the workspace root.
    pub const CONFIG_PATH: &'static str = ".config/e2e-report.toml";

    /// Contains the default config as a TOML file.
    ///
    /// Repository-specific configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the config from the workspace root, or from `config_file` if
    /// provided.
    ///
    /// `unknown_callback` is called with the config file and the set of keys
    /// that were not recognized, if there were any.
    pub fn from_sources(
        workspace_root: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
        mut unknown_callback: impl FnMut(&Utf8Path, &BTreeSet<String>),
    ) -> Result<Self, ConfigParseError> {
        let workspace_root = workspace_root.into();
        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = workspace_root.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let builder = Self::make_default_config().add_source(source);
        let (inner, unknown) = Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(&config_file, kind))?;

        if !unknown.is_empty() {
            unknown_callback(&config_file, &unknown);
        }

        tracing::debug!(%config_file, "loaded e2e-report config");
        Ok(Self {
            workspace_root,
            inner,
        })
    }

    /// Returns the default config, with no repository-specific settings.
    pub fn default_config(workspace_root: impl Into<Utf8PathBuf>) -> Self {
        let (inner, unknown) = Self::build_and_deserialize_config(&Self::make_default_config())
            .expect("default config is always valid");

        // Make sure there aren't any unknown keys in the default config, since it is
        // embedded/shipped with this binary.
        if !unknown.is_empty() {
            panic!(
                "found unknown keys in default config: {}",
                unknown.into_iter().collect::<Vec<_>>().join(", ")
            );
        }

        Self {
            workspace_root: workspace_root.into(),
            inner,
        }
    }

    /// Returns the workspace root that relative paths are resolved against.
    pub fn workspace_root(&self) -> &Utf8Path {
        &self.workspace_root
    }

    /// Returns the absolute path to the result store.
    pub fn store_path(&self) -> Utf8PathBuf {
        self.workspace_root.join(&self.inner.store.path)
    }

    /// Returns true if the store should be written as pretty-printed JSON.
    pub fn store_pretty(&self) -> bool {
        self.inner.store.pretty
    }

    /// Returns a result store configured from this config, optionally
    /// overriding the store path.
    pub fn result_store(&self, path_override: Option<&Utf8Path>) -> ResultStore {
        let path = match path_override {
            Some(path) => self.workspace_root.join(path),
            None => self.store_path(),
        };
        let mut store = ResultStore::new(path);
        store.set_pretty(self.store_pretty());
        store
    }

    /// Returns the configuration of the surrounding test execution setup.
    pub fn run(&self) -> &RunConfig {
        &self.inner.run
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<(ReportConfigImpl, BTreeSet<String>), ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let mut ignored = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            ignored.insert(path.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(config, &mut cb);
        let config: ReportConfigImpl =
            serde_path_to_error::deserialize(ignored_de).map_err(|error| {
                // Both serde_path_to_error and the config crate report the
                // key. Drop the key from the config error for consistency.
                let path = error.path().clone();
                let config_error = error.into_inner();
                let error = match config_error {
                    ConfigError::At { error, .. } => *error,
                    other => other,
                };
                ConfigParseErrorKind::DeserializeError(Box::new(serde_path_to_error::Error::new(
                    path, error,
                )))
            })?;

        Ok((config, ignored))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReportConfigImpl {
    store: StoreConfigImpl,
    run: RunConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct StoreConfigImpl {
    path: Utf8PathBuf,
    pretty: bool,
}

/// Configuration of the test execution setup that produces the outcomes.
///
/// None of these settings affect how results are merged.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunConfig {
    /// The base URL of the system under test.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Whether browsers run headless.
    pub headless: bool,

    /// The browser/device profiles the suites run against.
    #[serde(default)]
    pub profiles: Vec<RunProfile>,
}

impl RunConfig {
    /// Returns the names of the configured profiles, or `None` if no profiles
    /// are configured.
    pub fn known_environments(&self) -> Option<BTreeSet<&str>> {
        (!self.profiles.is_empty())
            .then(|| self.profiles.iter().map(|p| p.name.as_str()).collect())
    }
}

/// A named browser/device profile.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct RunProfile {
    /// The profile name. This is the environment recorded for each test.
    pub name: String,

    /// The device descriptor the profile is based on.
    #[serde(default)]
    pub device: Option<String>,

    /// A viewport override.
    #[serde(default)]
    pub viewport: Option<Viewport>,
}

/// A browser viewport size, in CSS pixels.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct Viewport {
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
