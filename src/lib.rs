//! apitest is a lightweight harness for API self-checks.
//!
//! An application that integrates with an API embeds a handful of checks
//! ("is the token accepted?", "does the response carry a rate limit
//! header?") and runs them at startup or on demand. apitest runs each check
//! against a timeout, classifies the outcome, and aggregates the outcomes into
//! a pass/partial/fail report together with a checklist of things a human has
//! to verify by hand.
//!
//! ## Testing Model
//! Checks are organized in test sets, and test sets in a suite.
//!   - A check registered with `require` fails its set when it fails.
//!   - A check registered with `suggest` only partially fails its set.
//!   - A check that does not settle within 3 seconds, or that panics, always
//!     fails, whatever its requirement level.
//!
//! Tests run one at a time in the order they were registered, and so do test
//! sets. Checks are free to touch shared state without stepping on each other.
//!
//! ```no_run
//! use apitest::executor::{Check, Suite, TestSet};
//!
//! # async fn demo() {
//! let auth = TestSet::new()
//!     .require("token-valid", Check::sync(String::new))
//!     .suggest("rate-limit-header", Check::sync(|| "missing header".into()))
//!     .manual("avatar", "Log in and check the avatar renders");
//!
//! let mut suite = Suite::new("My API").add_test_set("Auth", auth);
//! let report = suite.run().await;
//! println!("{}", report[0].verdict());
//! # }
//! ```
//!
//! ## Severity
//! Every result is `pass`, `partial` or `fail`. A set is as bad as its worst
//! test and a suite as bad as its worst set. A set without tests reports
//! `no tests` and counts as passing.
//!
//! ## Running a Suite from the Command Line
//! The `apitest` binary runs checks declared as shell commands in an
//! `apitest.toml` file:
//! ```toml
//! ver = "0.1.0"
//! # (Optional) Name of the suite. Defaults to the directory name.
//! name = "My API"
//! # (Optional) Timeout for each test in milliseconds. Defaults to 3000.
//! timeout_ms = 3000
//!
//! [[sets]]
//! name = "Auth"
//!   [[sets.tests]]
//!   name = "token-valid"
//!   # A zero exit status passes. Otherwise stderr is the failure message.
//!   cmd = "curl -sf -H \"Authorization: Bearer $TOKEN\" localhost:8080/me"
//!   [[sets.tests]]
//!   name = "rate-limit-header"
//!   cmd = "curl -sI localhost:8080/me | grep -qi x-ratelimit"
//!   level = "suggest"
//!   [sets.manual]
//!   avatar = "Log in and check the avatar renders"
//! ```
//!
//! Running `apitest` in that directory prints:
//! ```text
//! My API
//! Auth (2 tests) partial
//!   ✓ token-valid
//!   ~ rate-limit-header (exit code 1)
//!   manual checks
//!     ☐ avatar: Log in and check the avatar renders
//!   1 passing / 1 partial / 0 failing / 1 manual (partial)
//! ```
//!
//! The `--include` and `--exclude` flags select tests whose `<set>:<test>`
//! name matches a regex, `--only` prints only rows with a given status, and
//! `--json` prints the result tree as JSON. The exit code is 1 when the suite
//! fails and 0 otherwise.
pub mod cli;
pub mod errors;
pub mod executor;
pub mod picker;
pub mod printer;
