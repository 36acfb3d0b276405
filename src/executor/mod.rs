//! The executor runs tests, test sets and suites and classifies their results.

pub mod results;
pub mod set;
pub mod suite;
pub mod test;

use std::time::Duration;

pub use set::TestSet;
pub use suite::Suite;
pub use test::{Check, RequirementLevel, Test, TestOptions};

/// Time a single test may take before it is reported as failed.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);
