//! Outcome of a single compilation attempt.

use std::time::Duration;

/// Default width for error messages shown with `--show-errors`.
pub const ERROR_PREVIEW_MAX: usize = 100;

/// What the compiler did with a candidate.
///
/// Only `Success` keeps the candidate. Everything else is an ordinary
/// failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// Compiler exited with status 0.
    Success,
    /// Compiler exited non-zero.
    Failed { stderr: String },
    /// Compiler was still running when the timeout expired, and was killed.
    TimedOut { timeout: Duration },
    /// Compiler could not be run at all (missing binary, scratch I/O).
    Error { message: String },
}

/// Result of probing one source with the compiler.
#[derive(Debug, Clone)]
pub struct CompileResult {
    pub outcome: CompileOutcome,
    pub duration: Duration,
}

impl CompileResult {
    pub fn success(duration: Duration) -> Self {
        Self {
            outcome: CompileOutcome::Success,
            duration,
        }
    }

    pub fn failed(stderr: String, duration: Duration) -> Self {
        Self {
            outcome: CompileOutcome::Failed { stderr },
            duration,
        }
    }

    pub fn timed_out(timeout: Duration, duration: Duration) -> Self {
        Self {
            outcome: CompileOutcome::TimedOut { timeout },
            duration,
        }
    }

    pub fn error(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            outcome: CompileOutcome::Error {
                message: message.into(),
            },
            duration,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CompileOutcome::Success)
    }

    /// Full error text, empty on success.
    pub fn error_message(&self) -> String {
        match &self.outcome {
            CompileOutcome::Success => String::new(),
            CompileOutcome::Failed { stderr } => stderr.clone(),
            CompileOutcome::TimedOut { timeout } => format!("Timeout after {:?}", timeout),
            CompileOutcome::Error { message } => message.clone(),
        }
    }

    /// Error text cut to `max` characters, with `...` when truncated.
    pub fn short_error(&self, max: usize) -> String {
        let message = self.error_message();
        if message.chars().count() > max {
            let cut: String = message.chars().take(max).collect();
            format!("{}...", cut)
        } else {
            message
        }
    }
}
