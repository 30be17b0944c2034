use crate::decision::{DecisionEvent, LogContents, Outcome, ReasonCode};
use crate::error::{ApplicationError, ApplicationResult};
use crate::time::stamp;
use jiff::civil::DateTime;
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

/// Shift summary aggregated from the decision log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftReport {
    pub generated_at: DateTime,
    pub authorized: usize,
    pub denied: usize,
    pub enqueued: usize,
    pub enqueue_failed: usize,
    pub reasons: BTreeMap<ReasonCode, usize>,
    pub unreadable: usize,
}

impl ShiftReport {
    pub fn from_decisions<'a>(
        decisions: impl IntoIterator<Item = &'a DecisionEvent>,
        generated_at: DateTime,
    ) -> Self {
        let mut report = ShiftReport {
            generated_at,
            authorized: 0,
            denied: 0,
            enqueued: 0,
            enqueue_failed: 0,
            reasons: BTreeMap::new(),
            unreadable: 0,
        };
        for event in decisions {
            match event.outcome {
                Outcome::Authorized => report.authorized += 1,
                Outcome::Denied => report.denied += 1,
                Outcome::EnqueueSucceeded => report.enqueued += 1,
                Outcome::EnqueueFailed => report.enqueue_failed += 1,
            }
            if let Some(reason) = event.reason.filter(|_| event.is_refusal()) {
                *report.reasons.entry(reason).or_insert(0) += 1;
            }
        }
        report
    }

    pub fn from_log(contents: &LogContents, generated_at: DateTime) -> Self {
        ShiftReport {
            unreadable: contents.unreadable,
            ..Self::from_decisions(contents.decisions(), generated_at)
        }
    }

    pub fn refusals(&self) -> usize {
        self.denied + self.enqueue_failed
    }

    pub fn write_to(&self, path: &Path) -> ApplicationResult<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| ApplicationError::on_path(dir, e))?;
        }
        fs::write(path, self.to_string()).map_err(|e| ApplicationError::on_path(path, e))
    }
}

impl fmt::Display for ShiftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        writeln!(out, "--- TOWER OPERATION REPORT ---")?;
        writeln!(out, "Generated: {}", stamp(self.generated_at))?;
        writeln!(out)?;
        writeln!(out, "--- AUTHORIZATION SUMMARY ---")?;
        writeln!(out, "Operations authorized: {}", self.authorized)?;
        writeln!(out, "Operations denied: {}", self.denied)?;
        writeln!(out, "Flights enqueued: {}", self.enqueued)?;
        writeln!(out, "Enqueue failures: {}", self.enqueue_failed)?;
        writeln!(out, "Total refusals: {}", self.refusals())?;
        writeln!(out)?;
        writeln!(out, "--- REFUSAL REASONS ---")?;
        if self.reasons.is_empty() {
            writeln!(out, "No refusals recorded.")?;
        }
        for (reason, count) in &self.reasons {
            writeln!(out, "- {} ({reason}): {count}", reason.label())?;
        }
        if self.unreadable > 0 {
            writeln!(out)?;
            writeln!(out, "Unreadable log lines skipped: {}", self.unreadable)?;
        }
        f.write_str(&out)
    }
}
