//! End-of-run report.

use std::time::Duration;

use cf_core::{format_large_number, format_time_estimate};
use serde::Serialize;

use crate::stats::{rate, Counts};

/// Totals and estimates for a finished (or interrupted) run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub counts: Counts,
    pub success_rate: f64,
    pub elapsed_secs: f64,
    pub attempts_per_sec: f64,
    /// Size of the search space, `charset_len ^ byte_size`.
    pub combinations: f64,
    /// Time to try every combination at the observed rate.
    pub exhaustive_secs: Option<f64>,
    pub interrupted: bool,
    pub seed: u64,
}

impl RunSummary {
    pub fn new(
        counts: Counts,
        elapsed: Duration,
        combinations: f64,
        interrupted: bool,
        seed: u64,
    ) -> Self {
        let attempts_per_sec = rate(counts.attempts, elapsed);
        let exhaustive_secs = (attempts_per_sec > 0.0).then(|| combinations / attempts_per_sec);

        Self {
            counts,
            success_rate: counts.success_rate(),
            elapsed_secs: elapsed.as_secs_f64(),
            attempts_per_sec,
            combinations,
            exhaustive_secs,
            interrupted,
            seed,
        }
    }

    /// Format as the human-readable closing report.
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        if self.interrupted {
            report.push_str("\nStopped by user\n");
        }

        report.push_str(&format!(
            "\nTask completed. Total: {} attempts, {} successes ({:.2}%)\n",
            self.counts.attempts, self.counts.successes, self.success_rate
        ));
        report.push_str(&format!(
            "Processing speed: {:.2} per second\n",
            self.attempts_per_sec
        ));
        report.push_str(&format!("Time elapsed: {:.2} seconds\n", self.elapsed_secs));

        if let Some(secs) = self.exhaustive_secs {
            report.push_str(&format!(
                "Testing all {} combinations would take approximately {}\n",
                format_large_number(self.combinations),
                format_time_estimate(secs)
            ));
        }

        report.push_str(&format!("Seed: {}\n", self.seed));
        report
    }
}
