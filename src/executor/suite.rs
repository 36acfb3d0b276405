use super::{
    results::{self, SetReport, Verdict},
    set::{ReportHook, TestSet},
    DEFAULT_TIMEOUT,
};
use indexmap::IndexMap;
use regex::Regex;
use std::{fmt, sync::Arc, time::Duration};

/// Observer called after each set finishes with `(completed, total)`.
pub type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Top level collection of test sets.
#[derive(Clone)]
pub struct Suite {
    /// Name of this suite.
    pub name: String,
    sets: IndexMap<String, TestSet>,
    /// Timeout for every test that does not override it.
    timeout: Duration,
    progress: Option<ProgressFn>,
    /// Hooks collected from all sets during the last run.
    hooks: Vec<ReportHook>,
    last: Option<Vec<SetReport>>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: IndexMap::new(),
            timeout: DEFAULT_TIMEOUT,
            progress: None,
            hooks: Vec::new(),
            last: None,
        }
    }

    /// Register a test set. A set registered under an existing name replaces
    /// it without changing its position.
    pub fn add_test_set(mut self, name: impl Into<String>, set: TestSet) -> Self {
        self.sets.insert(name.into(), set);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn on_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(progress));
        self
    }

    /// Remove tests whose `<set>:<test>` key matches `exclude` or does not
    /// match `include`. Sets left without tests are kept.
    pub fn with_filters(
        mut self,
        include: Option<&Regex>,
        exclude: Option<&Regex>,
    ) -> Self {
        for (name, set) in self.sets.iter_mut() {
            set.retain_matching(name, include, exclude);
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn sets(&self) -> &IndexMap<String, TestSet> {
        &self.sets
    }

    /// Hooks gathered by the last run.
    pub fn hooks(&self) -> &[ReportHook] {
        &self.hooks
    }

    /// Result tree of the last run, if any.
    pub fn last_report(&self) -> Option<&[SetReport]> {
        self.last.as_deref()
    }

    /// Run every set in registration order. A set starts only once every
    /// test of the previous set has finished.
    pub async fn run(&mut self) -> Vec<SetReport> {
        let total = self.sets.len();
        let mut reports = Vec::with_capacity(total);
        self.hooks.clear();

        for (completed, (title, set)) in self.sets.iter().enumerate() {
            let run = set.run(self.timeout).await;
            self.hooks.extend(set.hooks().iter().cloned());

            let report = SetReport::new(title.clone(), run);
            tracing::info!(
                set = %title,
                verdict = %report.verdict(),
                completed = completed + 1,
                total,
                "test set finished"
            );
            if let Some(progress) = &self.progress {
                progress(completed + 1, total);
            }
            reports.push(report);
        }

        self.last = Some(reports.clone());
        reports
    }

    /// Aggregate verdict of the last run, `None` if it never ran.
    pub fn verdict(&self) -> Option<Verdict> {
        self.last.as_deref().map(results::suite_verdict)
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("sets", &self.sets)
            .field("timeout", &self.timeout)
            .finish()
    }
}
