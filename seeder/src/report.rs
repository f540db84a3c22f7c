//! Per-phase counts and timings. Nothing here feeds back into control flow.

use colored::*;
use std::io::{self, Write};
use std::time::Duration;

const STATUS_COLUMN: usize = 80;

/// One phase's outcome, kept for the end-of-run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRunRecord {
    pub phase: String,
    pub created: u64,
    pub existing: u64,
    pub duration: Duration,
}

impl SeedRunRecord {
    pub fn total(&self) -> u64 {
        self.created + self.existing
    }
}

#[derive(Debug, Default)]
pub struct Reporter {
    records: Vec<SeedRunRecord>,
    echo: bool,
}

impl Reporter {
    /// A reporter that prints status lines to stdout.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            echo: true,
        }
    }

    /// A reporter that only collects records.
    pub fn quiet() -> Self {
        Self::default()
    }

    pub fn begin(&self, phase: &str) {
        if !self.echo {
            return;
        }
        let name_str = format!("Seeding {}", phase.bold());
        let dots = ".".repeat(STATUS_COLUMN.saturating_sub(name_str.len()));
        print!("{}{} ", name_str, dots);
        io::stdout().flush().ok();
    }

    pub fn record(&mut self, phase: &str, created: u64, existing: u64, duration: Duration) {
        if self.echo {
            let counts = format!("{created} new, {existing} existing");
            let time_str = format!("({:.2?})", duration).dimmed();
            println!("{} {} {}", "done".green(), counts, time_str);
        }
        self.records.push(SeedRunRecord {
            phase: phase.to_owned(),
            created,
            existing,
            duration,
        });
    }

    pub fn fail(&self, phase: &str) {
        if self.echo {
            println!("{}", "failed".red());
        }
        log::error!("Phase `{phase}` did not complete");
    }

    pub fn records(&self) -> &[SeedRunRecord] {
        &self.records
    }

    pub fn record_for(&self, phase: &str) -> Option<&SeedRunRecord> {
        self.records.iter().find(|r| r.phase == phase)
    }

    /// Plain-text table of every recorded phase plus a totals row.
    pub fn summarize(&self) -> String {
        let width = self
            .records
            .iter()
            .map(|r| r.phase.len())
            .chain(std::iter::once("phase".len()))
            .max()
            .unwrap_or(5);

        let mut out = format!(
            "{:<width$}  {:>8}  {:>8}  {:>10}\n",
            "phase", "created", "existing", "time"
        );
        let (mut created, mut existing, mut elapsed) = (0, 0, Duration::ZERO);
        for r in &self.records {
            out.push_str(&format!(
                "{:<width$}  {:>8}  {:>8}  {:>10}\n",
                r.phase,
                r.created,
                r.existing,
                format!("{:.2?}", r.duration)
            ));
            created += r.created;
            existing += r.existing;
            elapsed += r.duration;
        }
        out.push_str(&format!(
            "{:<width$}  {:>8}  {:>8}  {:>10}",
            "total",
            created,
            existing,
            format!("{:.2?}", elapsed)
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_kept_in_order() {
        let mut reporter = Reporter::quiet();
        reporter.record("school", 1, 0, Duration::from_millis(3));
        reporter.record("users", 0, 5, Duration::from_millis(7));

        let phases: Vec<_> = reporter.records().iter().map(|r| r.phase.as_str()).collect();
        assert_eq!(phases, ["school", "users"]);
        assert_eq!(reporter.record_for("users").map(SeedRunRecord::total), Some(5));
        assert!(reporter.record_for("grades").is_none());
    }

    #[test]
    fn summary_has_a_row_per_phase_and_totals() {
        let mut reporter = Reporter::quiet();
        reporter.record("school", 1, 0, Duration::from_millis(1));
        reporter.record("announcements", 4, 2, Duration::from_millis(2));

        let summary = reporter.summarize();
        let lines: Vec<_> = summary.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("phase"));
        assert!(lines[2].starts_with("announcements"));
        let totals: Vec<_> = lines[3].split_whitespace().collect();
        assert_eq!(&totals[..3], ["total", "5", "2"]);
    }
}
