//! Compiler probe.
//!
//! Writes a source into a private scratch directory and runs
//! `<compiler> [args..] -c <src> -o <obj>` on it under a timeout.
//! The scratch directory, object file included, is removed on return.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

use crate::result::CompileResult;

const SOURCE_FILE_NAME: &str = "candidate.c";
const OBJECT_FILE_NAME: &str = "candidate.o";

/// Runs an external C compiler against candidate sources.
#[derive(Debug, Clone)]
pub struct CompilerProbe {
    compiler: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CompilerProbe {
    pub fn new(compiler: impl Into<String>, timeout: Duration) -> Self {
        Self {
            compiler: compiler.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Extra arguments placed before `-c`.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn compiler(&self) -> &str {
        &self.compiler
    }

    /// Compile `source` and report what happened.
    ///
    /// Never fails: a compiler that cannot be started or a scratch
    /// directory that cannot be written are reported as
    /// [`CompileOutcome::Error`](crate::CompileOutcome::Error).
    pub async fn probe(&self, source: &str) -> CompileResult {
        let start = Instant::now();

        let scratch = match tempfile::Builder::new().prefix("cf-probe-").tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                return CompileResult::error(
                    format!("Failed to create scratch directory: {}", e),
                    start.elapsed(),
                )
            }
        };

        let source_path = scratch.path().join(SOURCE_FILE_NAME);
        if let Err(e) = tokio::fs::write(&source_path, source).await {
            return CompileResult::error(
                format!("Failed to write {}: {}", source_path.display(), e),
                start.elapsed(),
            );
        }

        let object_path = scratch.path().join(OBJECT_FILE_NAME);
        self.run_compiler(&source_path, &object_path, start).await
        // `scratch` drops here and takes the source and object with it.
    }

    async fn run_compiler(&self, source: &Path, object: &Path, start: Instant) -> CompileResult {
        let mut cmd = Command::new(&self.compiler);
        cmd.args(&self.args)
            .arg("-c")
            .arg(source)
            .arg("-o")
            .arg(object)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let result = tokio::time::timeout(self.timeout, cmd.output()).await;
        let duration = start.elapsed();

        match result {
            Ok(Ok(output)) => {
                if output.status.success() {
                    CompileResult::success(duration)
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                    CompileResult::failed(stderr, duration)
                }
            }
            Ok(Err(e)) => CompileResult::error(
                format!("Failed to run {}: {}", self.compiler, e),
                duration,
            ),
            Err(_) => CompileResult::timed_out(self.timeout, duration),
        }
    }
}

/// Extract the first error line from compiler output.
pub fn first_error_line(stderr: &str) -> String {
    for line in stderr.lines() {
        if line.contains("error:") {
            return line.trim().to_string();
        }
    }

    stderr
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("unknown error")
        .trim()
        .to_string()
}
