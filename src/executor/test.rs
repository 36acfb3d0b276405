use super::results::{Severity, TestResult};
use futures::future::{self, BoxFuture, FutureExt};
use serde::Deserialize;
use std::{
    any::Any,
    fmt,
    future::Future,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::Duration,
};
use tokio::time;

/// Signal produced by a check: `Ok` with a success message or `Err` with a
/// failure message.
pub type CheckFuture = BoxFuture<'static, Result<String, String>>;

/// Whether a failing check breaks the integration or merely degrades it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementLevel {
    /// Failure is reported as `Severity::Fail`.
    Require,
    /// Failure is reported as `Severity::Partially`.
    Suggest,
}

impl Default for RequirementLevel {
    fn default() -> Self {
        RequirementLevel::Require
    }
}

/// A caller-supplied check.
#[derive(Clone)]
pub enum Check {
    /// Returns an empty string on success and the failure message otherwise.
    Sync(Arc<dyn Fn() -> String + Send + Sync>),
    /// Returns a future settling with the success or failure message.
    Async(Arc<dyn Fn() -> CheckFuture + Send + Sync>),
}

impl Check {
    /// Wrap a synchronous check.
    pub fn sync<F>(check: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Check::Sync(Arc::new(check))
    }

    /// Wrap an asynchronous check.
    pub fn future<F, Fut>(check: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, String>> + Send + 'static,
    {
        Check::Async(Arc::new(move || check().boxed()))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Check::Async(_))
    }

    /// Call the check and adapt its return value into a signal. Fails with
    /// the panic message if the call itself panics.
    fn invoke(&self) -> Result<CheckFuture, String> {
        match self {
            Check::Sync(check) => {
                panic::catch_unwind(AssertUnwindSafe(|| check()))
                    .map(|msg| {
                        let signal = if msg.is_empty() { Ok(msg) } else { Err(msg) };
                        future::ready(signal).boxed()
                    })
                    .map_err(panic_message)
            }
            Check::Async(check) => {
                panic::catch_unwind(AssertUnwindSafe(|| check()))
                    .map_err(panic_message)
            }
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Check::Sync(_) => write!(f, "Check::Sync(..)"),
            Check::Async(_) => write!(f, "Check::Async(..)"),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let reason = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    format!("Check panicked: {}", reason)
}

/// Per-test execution options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestOptions {
    /// Hide this test in rendered reports when it passes.
    pub hide_on_success: bool,
    /// Overrides the timeout given by the enclosing suite.
    pub timeout: Option<Duration>,
}

impl TestOptions {
    pub fn hidden() -> Self {
        Self {
            hide_on_success: true,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A check together with its requirement level and options.
#[derive(Debug, Clone)]
pub struct Test {
    pub check: Check,
    pub level: RequirementLevel,
    pub options: TestOptions,
}

impl Test {
    pub fn new(check: Check, level: RequirementLevel, options: TestOptions) -> Self {
        Self {
            check,
            level,
            options,
        }
    }

    /// Run the check once, racing it against the timeout. Every outcome,
    /// including panics and timeouts, is turned into a `TestResult`.
    pub async fn run(&self, default_timeout: Duration) -> TestResult {
        let timeout = self.options.timeout.unwrap_or(default_timeout);

        let signal = match self.check.invoke() {
            Ok(signal) => signal,
            Err(fault) => {
                tracing::warn!("{}", fault);
                return TestResult::new(Severity::Fail, fault);
            }
        };

        // The losing side of the race is dropped here, so a check that
        // settles after the deadline can never be observed.
        let settled =
            time::timeout(timeout, AssertUnwindSafe(signal).catch_unwind())
                .await;

        match settled {
            Err(_) => {
                tracing::warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "check timed out"
                );
                TestResult::new(
                    Severity::Fail,
                    format!("Timed out after {}ms", timeout.as_millis()),
                )
            }
            Ok(Err(payload)) => {
                let fault = panic_message(payload);
                tracing::warn!("{}", fault);
                TestResult::new(Severity::Fail, fault)
            }
            Ok(Ok(Ok(message))) => {
                tracing::debug!(status = %Severity::Pass, "check settled");
                TestResult {
                    status: Severity::Pass,
                    message,
                    hide_on_success: self.options.hide_on_success,
                }
            }
            Ok(Ok(Err(message))) => {
                let status = match self.level {
                    RequirementLevel::Require => Severity::Fail,
                    RequirementLevel::Suggest => Severity::Partially,
                };
                tracing::debug!(status = %status, "check settled");
                TestResult::new(status, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::DEFAULT_TIMEOUT;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    fn build(check: Check, level: RequirementLevel) -> Test {
        Test::new(check, level, TestOptions::default())
    }

    #[tokio::test]
    async fn empty_string_passes() {
        for level in [RequirementLevel::Require, RequirementLevel::Suggest].iter() {
            let res = build(Check::sync(String::new), *level)
                .run(DEFAULT_TIMEOUT)
                .await;
            assert_eq!(res.status, Severity::Pass);
            assert_eq!(res.message, "");
        }
    }

    #[tokio::test]
    async fn failure_severity_follows_level() {
        let check = Check::sync(|| "missing header".to_string());

        let res = build(check.clone(), RequirementLevel::Require)
            .run(DEFAULT_TIMEOUT)
            .await;
        assert_eq!(res, TestResult::new(Severity::Fail, "missing header"));

        let res = build(check, RequirementLevel::Suggest)
            .run(DEFAULT_TIMEOUT)
            .await;
        assert_eq!(res, TestResult::new(Severity::Partially, "missing header"));
    }

    #[tokio::test]
    async fn async_signals() {
        let ok = Check::future(|| async { Ok("token accepted".to_string()) });
        let res = build(ok, RequirementLevel::Require).run(DEFAULT_TIMEOUT).await;
        assert_eq!(res.status, Severity::Pass);
        assert_eq!(res.message, "token accepted");

        let err = Check::future(|| async { Err("401".to_string()) });
        let res = build(err, RequirementLevel::Suggest).run(DEFAULT_TIMEOUT).await;
        assert_eq!(res, TestResult::new(Severity::Partially, "401"));
    }

    #[tokio::test]
    async fn hide_on_success_only_on_pass() {
        let opts = TestOptions::hidden();
        let res = Test::new(Check::sync(String::new), RequirementLevel::Require, opts)
            .run(DEFAULT_TIMEOUT)
            .await;
        assert!(res.hide_on_success);

        let res = Test::new(
            Check::sync(|| "nope".to_string()),
            RequirementLevel::Require,
            opts,
        )
        .run(DEFAULT_TIMEOUT)
        .await;
        assert!(!res.hide_on_success);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_check_times_out_regardless_of_level() {
        for level in [RequirementLevel::Require, RequirementLevel::Suggest].iter() {
            let hung = Check::future(future::pending::<Result<String, String>>);
            let start = Instant::now();
            let res = Test::new(hung, *level, TestOptions::hidden())
                .run(DEFAULT_TIMEOUT)
                .await;
            let elapsed = start.elapsed();

            assert_eq!(res.status, Severity::Fail);
            assert_eq!(res.message, "Timed out after 3000ms");
            assert!(!res.hide_on_success);
            assert!(elapsed >= Duration::from_millis(3000));
            assert!(elapsed < Duration::from_millis(3010));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn late_success_is_ignored() {
        let settled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&settled);
        let late = Check::future(move || {
            let counter = Arc::clone(&counter);
            async move {
                time::sleep(Duration::from_millis(4000)).await;
                counter.fetch_add(1, Ordering::SeqCst);
                Ok("too late".to_string())
            }
        });

        let res = build(late, RequirementLevel::Suggest)
            .run(DEFAULT_TIMEOUT)
            .await;
        assert_eq!(res.status, Severity::Fail);

        time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(settled.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn per_test_timeout_override() {
        let hung = Check::future(future::pending::<Result<String, String>>);
        let opts = TestOptions::default().with_timeout(Duration::from_millis(250));
        let res = Test::new(hung, RequirementLevel::Require, opts)
            .run(DEFAULT_TIMEOUT)
            .await;
        assert_eq!(res.message, "Timed out after 250ms");
    }

    #[tokio::test]
    async fn panicking_invocation_fails() {
        let check = Check::sync(|| panic!("no window object"));
        let res = build(check, RequirementLevel::Suggest)
            .run(DEFAULT_TIMEOUT)
            .await;
        assert_eq!(res.status, Severity::Fail);
        assert!(res.message.contains("no window object"));
        assert!(!res.hide_on_success);
    }

    #[tokio::test]
    async fn panicking_future_fails() {
        let check = Check::future(|| async {
            if true {
                panic!("{}", String::from("socket closed"));
            }
            Ok(String::new())
        });
        let res = build(check, RequirementLevel::Suggest)
            .run(DEFAULT_TIMEOUT)
            .await;
        assert_eq!(res.status, Severity::Fail);
        assert!(res.message.contains("socket closed"));
    }
}
