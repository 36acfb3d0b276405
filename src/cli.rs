use crate::{errors::ApiTestError, executor::results::Severity};
use std::path::PathBuf;
use structopt::StructOpt;

/// Options for the CLI.
#[derive(StructOpt, Debug)]
#[structopt(name = "apitest", about = "Run API self-checks and report pass/partial/fail.")]
pub struct Opts {
    /// Directory containing apitest.toml.
    #[structopt(name = "TEST_DIR", parse(from_os_str), default_value = ".")]
    pub dir: PathBuf,

    /// Only run tests whose `<set>:<test>` name matches this regex.
    #[structopt(short, long = "include")]
    pub include_filter: Option<String>,

    /// Skip tests whose `<set>:<test>` name matches this regex.
    #[structopt(short, long = "exclude")]
    pub exclude_filter: Option<String>,

    /// Only display tests with a specific status.
    #[structopt(short = "o", long = "only")]
    pub post_filter: Option<OnlyOpt>,

    /// Show tests hidden on success and enable debug logging.
    #[structopt(short, long)]
    pub verbose: bool,

    /// Print the report as JSON.
    #[structopt(long)]
    pub json: bool,

    /// Override the per-test timeout in milliseconds.
    #[structopt(long)]
    pub timeout: Option<u64>,

    /// Print the tests that would run without running them.
    #[structopt(short = "n", long)]
    pub dry_run: bool,
}

/// Possible values for the --only flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OnlyOpt {
    /// Passing tests.
    Pass,
    /// Failing suggested tests.
    Partial,
    /// Failing tests.
    Fail,
}

impl From<OnlyOpt> for Severity {
    fn from(only: OnlyOpt) -> Self {
        match only {
            OnlyOpt::Pass => Severity::Pass,
            OnlyOpt::Partial => Severity::Partially,
            OnlyOpt::Fail => Severity::Fail,
        }
    }
}

impl std::str::FromStr for OnlyOpt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass" => Ok(OnlyOpt::Pass),
            "partial" => Ok(OnlyOpt::Partial),
            "fail" => Ok(OnlyOpt::Fail),
            _ => Err("Must be one of pass, partial, fail.".to_string()),
        }
    }
}

impl Opts {
    /// Compile the include and exclude regexes.
    pub fn filters(
        &self,
    ) -> Result<(Option<regex::Regex>, Option<regex::Regex>), ApiTestError> {
        let compile = |flag: &'static str, reg: &Option<String>| {
            reg.as_deref()
                .map(regex::Regex::new)
                .transpose()
                .map_err(|source| ApiTestError::Regex { flag, source })
        };
        Ok((
            compile("--include", &self.include_filter)?,
            compile("--exclude", &self.exclude_filter)?,
        ))
    }
}
