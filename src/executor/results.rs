use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// How bad the outcome of a test is. Ordered so that aggregation is a `max`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The check succeeded.
    Pass = 0,
    /// A suggested check failed.
    Partially = 1,
    /// A required check failed, timed out, or faulted.
    Fail = 2,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Severity::Pass => "pass",
            Severity::Partially => "partial",
            Severity::Fail => "fail",
        };
        f.pad(s)
    }
}

/// Outcome of running one test once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    /// Classified outcome.
    pub status: Severity,
    /// Success value, failure message, or diagnostic.
    pub message: String,
    /// Hide the row in rendered reports when the status is `Pass`.
    pub hide_on_success: bool,
}

impl TestResult {
    /// A result that is never hidden.
    pub fn new(status: Severity, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            hide_on_success: false,
        }
    }

    /// True if a renderer should skip this result.
    pub fn is_hidden(&self) -> bool {
        self.hide_on_success && self.status == Severity::Pass
    }
}

/// A test result tagged with the name it was registered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedResult {
    pub name: String,
    pub result: TestResult,
}

/// Aggregate outcome of a collection of results.
///
/// A collection without any results has no maximum. Instead of inventing
/// one, it is reported as `Empty`, which counts as `Pass` when it is folded
/// into a larger aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Nothing was tested.
    Empty,
    /// Maximum severity over at least one result.
    Graded(Severity),
}

impl Verdict {
    /// Severity used when this verdict is combined with others.
    pub fn severity(self) -> Severity {
        match self {
            Verdict::Empty => Severity::Pass,
            Verdict::Graded(sev) => sev,
        }
    }

    /// Fold a sequence of severities into a verdict.
    pub fn from_severities<I>(severities: I) -> Self
    where
        I: IntoIterator<Item = Severity>,
    {
        severities
            .into_iter()
            .max()
            .map(Verdict::Graded)
            .unwrap_or(Verdict::Empty)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Empty => f.pad("no tests"),
            Verdict::Graded(sev) => fmt::Display::fmt(sev, f),
        }
    }
}

/// Results of running one test set.
#[derive(Debug, Clone, Serialize)]
pub struct SetRun {
    /// Results in registration order.
    pub auto_tests: Vec<NamedResult>,
    /// Manual checklist entries, passed through untouched.
    pub manual_tests: IndexMap<String, String>,
}

/// One node of the result tree produced by a suite run.
#[derive(Debug, Clone, Serialize)]
pub struct SetReport {
    /// Name of the test set.
    pub title: String,
    /// Results in registration order.
    pub auto_tests: Vec<NamedResult>,
    /// Manual checklist entries, passed through untouched.
    pub manual_tests: IndexMap<String, String>,
}

impl SetReport {
    pub fn new(title: String, run: SetRun) -> Self {
        let SetRun {
            auto_tests,
            manual_tests,
        } = run;
        Self {
            title,
            auto_tests,
            manual_tests,
        }
    }

    /// Maximum severity over the automatic tests of this set.
    pub fn verdict(&self) -> Verdict {
        Verdict::from_severities(
            self.auto_tests.iter().map(|named| named.result.status),
        )
    }

    /// Number of results with the given status.
    pub fn count(&self, status: Severity) -> usize {
        self.auto_tests
            .iter()
            .filter(|named| named.result.status == status)
            .count()
    }
}

/// Maximum severity over an entire result tree. Empty sets count as `Pass`.
pub fn suite_verdict(reports: &[SetReport]) -> Verdict {
    if reports.iter().all(|rep| rep.auto_tests.is_empty()) {
        return Verdict::Empty;
    }
    Verdict::from_severities(reports.iter().map(|rep| rep.verdict().severity()))
}
