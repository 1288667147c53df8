//! Attempt counters and progress lines.
//!
//! All three counters move together under one lock, so every snapshot
//! satisfies `attempts == successes + failures`.

use std::io;
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::result::{CompileResult, ERROR_PREVIEW_MAX};

/// Attempts between `Progress:` lines.
pub const PROGRESS_INTERVAL: u64 = 100;

/// Snapshot of the run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
}

impl Counts {
    /// Success percentage, 0 when nothing was attempted.
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.successes as f64 / self.attempts as f64 * 100.0
        }
    }
}

/// How one attempt ended, as far as reporting is concerned.
#[derive(Debug)]
pub enum Attempt<'a> {
    /// Compiled and written to this path.
    Saved(&'a Path),
    /// Compiled, but writing the file failed.
    SaveFailed(&'a io::Error),
    /// The compiler did not accept it.
    Rejected(&'a CompileResult),
}

impl Attempt<'_> {
    /// Only a persisted program counts as a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Attempt::Saved(_))
    }
}

/// Shared counters for a run.
#[derive(Debug, Default)]
pub struct Stats {
    counts: Mutex<Counts>,
    started: OnceLock<Instant>,
}

impl Stats {
    /// Start the run clock. Later calls keep the first start time.
    pub fn start(&self) {
        let _ = self.started.set(Instant::now());
    }

    /// Count one finished attempt and return the counters after it.
    ///
    /// `report` runs while the counters are still locked, so reports from
    /// concurrent workers come out in counter order.
    pub fn record<F>(&self, success: bool, report: F) -> Counts
    where
        F: FnOnce(&Counts),
    {
        // Counters stay consistent even if a holder panicked.
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        counts.attempts += 1;
        if success {
            counts.successes += 1;
        } else {
            counts.failures += 1;
        }
        debug_assert_eq!(counts.attempts, counts.successes + counts.failures);

        report(&counts);
        *counts
    }

    pub fn snapshot(&self) -> Counts {
        *self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Time since [`Stats::start`], zero before it.
    pub fn elapsed(&self) -> Duration {
        self.started.get().map(Instant::elapsed).unwrap_or_default()
    }

    /// Attempts per second since the run started.
    pub fn rate(&self, counts: &Counts) -> f64 {
        rate(counts.attempts, self.elapsed())
    }
}

pub(crate) fn rate(attempts: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        attempts as f64 / secs
    } else {
        0.0
    }
}

/// Progress line printer.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Print compiler errors for failed attempts.
    pub show_errors: bool,
    /// Print a speed line every N attempts (unlimited mode).
    pub speed_interval: Option<u64>,
    /// Print nothing.
    pub quiet: bool,
}

impl Progress {
    /// Report one attempt.
    pub fn attempt(&self, counts: &Counts, attempt: &Attempt<'_>, rate: f64) {
        if self.quiet {
            return;
        }
        for line in self.lines(counts, attempt, rate) {
            println!("{}", line);
        }
    }

    /// The lines [`Progress::attempt`] prints.
    pub fn lines(&self, counts: &Counts, attempt: &Attempt<'_>, rate: f64) -> Vec<String> {
        let mut lines = Vec::new();

        match attempt {
            Attempt::Saved(path) => lines.push(format!(
                "Compilation successful! ({}/{}) - Saved as {}",
                counts.successes,
                counts.attempts,
                path.display()
            )),
            // Not a compiler error, so it is shown without --show-errors.
            Attempt::SaveFailed(e) => {
                lines.push(format!("Compilation succeeded but could not be saved: {}", e))
            }
            Attempt::Rejected(result) if self.show_errors => lines.push(format!(
                "Compilation failed: {}",
                result.short_error(ERROR_PREVIEW_MAX)
            )),
            Attempt::Rejected(_) => {}
        }

        if counts.attempts % PROGRESS_INTERVAL == 0 {
            lines.push(format!(
                "Progress: {} attempts, {} successes ({:.2}%)",
                counts.attempts,
                counts.successes,
                counts.success_rate()
            ));
        }

        if let Some(every) = self.speed_interval {
            if every > 0 && counts.attempts % every == 0 {
                lines.push(format!(
                    "Processing speed: {:.2} per second (total: {})",
                    rate, counts.attempts
                ));
            }
        }

        lines
    }
}
