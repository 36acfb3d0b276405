//! The default picker for apitest suites that gathers tests to run from an
//! apitest.toml file.
use indexmap::IndexMap;
use serde::Deserialize;
use std::{path::Path, time::Duration};

use super::command::command_check;
use crate::{
    errors::ApiTestError,
    executor::{RequirementLevel, Suite, TestOptions, TestSet},
};

/// Name of the configuration file looked up in the test directory.
pub const CONFIG_FILE: &str = "apitest.toml";

/// Configuration for a single apitest run.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Version of the apitest tool this configuration is compatible with.
    pub ver: String,
    /// Name of the suite. Defaults to the directory name.
    pub name: Option<String>,
    /// Default timeout for every test in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Test set configurations.
    #[serde(default)]
    pub sets: Vec<SetConfig>,
}

/// Configuration for a test set.
#[derive(Debug, Deserialize)]
pub struct SetConfig {
    /// Name of this set.
    pub name: String,
    #[serde(default)]
    pub tests: Vec<TestConfig>,
    /// Checklist entries for a human to verify.
    #[serde(default)]
    pub manual: IndexMap<String, String>,
}

/// Configuration for a single test.
#[derive(Debug, Deserialize)]
pub struct TestConfig {
    pub name: String,
    /// Command run through `sh -c`.
    pub cmd: String,
    #[serde(default)]
    pub level: RequirementLevel,
    #[serde(default)]
    pub hide_on_success: bool,
    /// Overrides the suite timeout.
    pub timeout_ms: Option<u64>,
}

impl Config {
    /// Create a configuration by reading an `apitest.toml` file.
    /// Ensures that the version number specified in the file matches the
    /// version of the installed `apitest` binary.
    pub fn from_path(conf_dir: &Path) -> Result<Self, ApiTestError> {
        let conf_path = conf_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&conf_path)
            .map_err(|_| ApiTestError::MissingConfig(conf_path.clone()))?;

        let conf: Config = toml::from_str(&contents).map_err(|source| {
            ApiTestError::Config {
                path: conf_path.clone(),
                source,
            }
        })?;

        if env!("CARGO_PKG_VERSION") != conf.ver {
            return Err(ApiTestError::Version {
                required: conf.ver,
                found: env!("CARGO_PKG_VERSION").to_string(),
            });
        }

        tracing::debug!(
            path = %conf_path.display(),
            sets = conf.sets.len(),
            "loaded configuration"
        );
        Ok(conf)
    }

    /// Build the suite described by this configuration.
    pub fn into_suite(self, default_name: &str) -> Suite {
        let Config {
            name,
            timeout_ms,
            sets,
            ..
        } = self;

        let mut suite = Suite::new(name.unwrap_or_else(|| default_name.to_string()));
        if let Some(ms) = timeout_ms {
            suite = suite.with_timeout(Duration::from_millis(ms));
        }
        sets.into_iter().fold(suite, |suite, set| {
            let name = set.name.clone();
            suite.add_test_set(name, TestSet::from(set))
        })
    }
}

impl From<SetConfig> for TestSet {
    fn from(conf: SetConfig) -> Self {
        let set = conf.tests.into_iter().fold(TestSet::new(), |set, test| {
            let mut options = TestOptions {
                hide_on_success: test.hide_on_success,
                timeout: None,
            };
            if let Some(ms) = test.timeout_ms {
                options = options.with_timeout(Duration::from_millis(ms));
            }
            let check = command_check(test.cmd);
            match test.level {
                RequirementLevel::Require => {
                    set.require_with(test.name, check, options)
                }
                RequirementLevel::Suggest => {
                    set.suggest_with(test.name, check, options)
                }
            }
        });
        conf.manual
            .into_iter()
            .fold(set, |set, (id, content)| set.manual(id, content))
    }
}
