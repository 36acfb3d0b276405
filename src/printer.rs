//! Render a result tree for the terminal or as JSON.
use crate::executor::results::{self, NamedResult, SetReport, Severity, Verdict};
use colored::*;
use serde::Serialize;

/// Which rows to print.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintOpts {
    /// Print rows hidden by `hide_on_success`.
    pub verbose: bool,
    /// Only print rows with this status.
    pub only: Option<Severity>,
}

impl PrintOpts {
    fn should_print(&self, named: &NamedResult) -> bool {
        if let Some(only) = self.only {
            return named.result.status == only;
        }
        self.verbose || !named.result.is_hidden()
    }
}

/// Counts of results across a tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub pass: usize,
    pub partial: usize,
    pub fail: usize,
    pub manual: usize,
}

impl Summary {
    pub fn of(reports: &[SetReport]) -> Self {
        reports.iter().fold(Summary::default(), |acc, rep| Summary {
            pass: acc.pass + rep.count(Severity::Pass),
            partial: acc.partial + rep.count(Severity::Partially),
            fail: acc.fail + rep.count(Severity::Fail),
            manual: acc.manual + rep.manual_tests.len(),
        })
    }
}

fn paint(text: &str, sev: Severity) -> ColoredString {
    match sev {
        Severity::Pass => text.green(),
        Severity::Partially => text.yellow(),
        Severity::Fail => text.red(),
    }
}

fn marker(sev: Severity) -> &'static str {
    match sev {
        Severity::Pass => "✓ ",
        Severity::Partially => "~ ",
        Severity::Fail => "✗ ",
    }
}

/// Generate colorized string to report the result of one test.
pub fn report_str(named: &NamedResult) -> String {
    let NamedResult { name, result } = named;
    let mut buf = String::new();
    buf.push_str(&paint(marker(result.status), result.status).to_string());
    buf.push_str(&paint(name, result.status).to_string());
    if !result.message.is_empty() {
        buf.push_str(&format!(" ({})", result.message).dimmed().to_string());
    }
    buf
}

fn verdict_str(verdict: Verdict) -> ColoredString {
    match verdict {
        Verdict::Empty => verdict.to_string().dimmed(),
        Verdict::Graded(sev) => paint(&sev.to_string(), sev).bold(),
    }
}

/// Render one set with its header, visible rows, and manual checklist.
pub fn set_str(report: &SetReport, opts: &PrintOpts) -> String {
    let mut buf = String::with_capacity(500);
    buf.push_str(&format!(
        "{} ({} tests) {}\n",
        report.title.bold(),
        report.auto_tests.len(),
        verdict_str(report.verdict())
    ));
    report
        .auto_tests
        .iter()
        .filter(|named| opts.should_print(named))
        .for_each(|named| buf.push_str(&format!("  {}\n", report_str(named))));

    if !report.manual_tests.is_empty() && opts.only.is_none() {
        buf.push_str(&format!("  {}\n", "manual checks".blue()));
        report.manual_tests.iter().for_each(|(id, content)| {
            buf.push_str(&format!("    ☐ {}: {}\n", id.bold(), content));
        });
    }
    buf
}

/// Render the whole tree followed by a summary line.
pub fn suite_str(name: &str, reports: &[SetReport], opts: &PrintOpts) -> String {
    let mut buf = String::new();
    buf.push_str(&format!("{}\n", name.bold().underline()));
    reports
        .iter()
        .for_each(|report| buf.push_str(&set_str(report, opts)));

    let Summary {
        pass,
        partial,
        fail,
        manual,
    } = Summary::of(reports);
    buf.push_str(&format!(
        "  {} / {} / {}",
        format!("{} passing", pass).green(),
        format!("{} partial", partial).yellow(),
        format!("{} failing", fail).red(),
    ));
    if manual > 0 {
        buf.push_str(&format!(" / {}", format!("{} manual", manual).blue()));
    }
    buf.push_str(&format!(" ({})\n", verdict_str(results::suite_verdict(reports))));
    buf
}

#[derive(Serialize)]
struct JsonReport<'a> {
    name: &'a str,
    verdict: Verdict,
    summary: Summary,
    sets: &'a [SetReport],
}

/// Render the tree as pretty-printed JSON.
pub fn suite_json(
    name: &str,
    reports: &[SetReport],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport {
        name,
        verdict: results::suite_verdict(reports),
        summary: Summary::of(reports),
        sets: reports,
    })
}
