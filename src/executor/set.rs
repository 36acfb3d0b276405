use super::{
    results::{NamedResult, SetRun},
    test::{Check, RequirementLevel, Test, TestOptions},
};
use indexmap::IndexMap;
use regex::Regex;
use std::{fmt, sync::Arc, time::Duration};

/// Callback run by a reporter once it has rendered a set.
pub type ReportHook = Arc<dyn Fn() + Send + Sync>;

/// A named group of tests and manual checklist entries.
///
/// Registering a name twice replaces the earlier entry in place, so the
/// name keeps the position it was first registered at.
#[derive(Clone, Default)]
pub struct TestSet {
    tests: IndexMap<String, Test>,
    manual_tests: IndexMap<String, String>,
    hooks: Vec<ReportHook>,
}

impl TestSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(
        mut self,
        name: impl Into<String>,
        check: Check,
        level: RequirementLevel,
        options: TestOptions,
    ) -> Self {
        self.tests
            .insert(name.into(), Test::new(check, level, options));
        self
    }

    /// Register a check whose failure fails the set.
    pub fn require(self, name: impl Into<String>, check: Check) -> Self {
        self.require_with(name, check, TestOptions::default())
    }

    pub fn require_with(
        self,
        name: impl Into<String>,
        check: Check,
        options: TestOptions,
    ) -> Self {
        self.register(name, check, RequirementLevel::Require, options)
    }

    /// Register a check whose failure only partially fails the set.
    pub fn suggest(self, name: impl Into<String>, check: Check) -> Self {
        self.suggest_with(name, check, TestOptions::default())
    }

    pub fn suggest_with(
        self,
        name: impl Into<String>,
        check: Check,
        options: TestOptions,
    ) -> Self {
        self.register(name, check, RequirementLevel::Suggest, options)
    }

    /// Register an entry for a human to verify. Never executed.
    pub fn manual(
        mut self,
        id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.manual_tests.insert(id.into(), content.into());
        self
    }

    /// Register a callback for the reporter to run after rendering this set.
    pub fn on_report_ready<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn hooks(&self) -> &[ReportHook] {
        &self.hooks
    }

    pub fn tests(&self) -> &IndexMap<String, Test> {
        &self.tests
    }

    pub fn manual_tests(&self) -> &IndexMap<String, String> {
        &self.manual_tests
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Keep only the tests whose `<set>:<test>` key passes the filters.
    pub fn retain_matching(
        &mut self,
        set_name: &str,
        include: Option<&Regex>,
        exclude: Option<&Regex>,
    ) {
        self.tests.retain(|name, _| {
            let key = format!("{}:{}", set_name, name);
            include.map(|inc| inc.is_match(&key)).unwrap_or(true)
                && !exclude.map(|ex| ex.is_match(&key)).unwrap_or(false)
        });
    }

    /// Run every test once, one after another, in registration order.
    /// Failures never stop the remaining tests.
    pub async fn run(&self, timeout: Duration) -> SetRun {
        let mut auto_tests = Vec::with_capacity(self.tests.len());
        for (name, test) in &self.tests {
            tracing::debug!(test = %name, "running");
            let result = test.run(timeout).await;
            tracing::debug!(test = %name, status = %result.status, "finished");
            auto_tests.push(NamedResult {
                name: name.clone(),
                result,
            });
        }

        SetRun {
            auto_tests,
            manual_tests: self.manual_tests.clone(),
        }
    }
}

impl fmt::Debug for TestSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TestSet")
            .field("tests", &self.tests)
            .field("manual_tests", &self.manual_tests)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
