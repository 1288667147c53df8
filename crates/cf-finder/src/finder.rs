//! Search orchestration.
//!
//! A run hands out task ids from one atomic counter to a fixed set of
//! tokio workers. Each task is independent:
//!
//! ```text
//! seed(task) → generate → embed → compile → [save] → record
//! ```
//!
//! Bounded runs stop once every id below the limit has been claimed, so a
//! limit of `k` is exactly `k` attempts. Unlimited runs go until the
//! shutdown future resolves; workers finish their in-flight attempt first.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cf_core::{combinations, template, Charset, CoreError};
use cf_random::{CandidateGenerator, DeterministicRng, RandomError};
use tokio::task::JoinSet;

use crate::compiler::{first_error_line, CompilerProbe};
use crate::output::{OutputDir, DEFAULT_OUTPUT_DIR};
use crate::result::{CompileOutcome, CompileResult};
use crate::stats::{Attempt, Progress, Stats};
use crate::summary::RunSummary;

/// Batch factor for unlimited-mode speed lines: one line per `workers * 10` attempts.
const SPEED_BATCH_PER_WORKER: u64 = 10;

/// How many attempts a run makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskLimit {
    Bounded(u64),
    Unlimited,
}

impl TaskLimit {
    /// Parse the CLI form: `-1` is unlimited, other values are a count.
    pub fn from_cli(tasks: i64) -> Result<Self, FinderError> {
        match tasks {
            -1 => Ok(TaskLimit::Unlimited),
            n if n >= 0 => Ok(TaskLimit::Bounded(n as u64)),
            n => Err(FinderError::InvalidTaskCount(n)),
        }
    }

    /// Whether `task_id` (0-based) is within the limit.
    pub fn allows(&self, task_id: u64) -> bool {
        match self {
            TaskLimit::Bounded(n) => task_id < *n,
            TaskLimit::Unlimited => true,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, TaskLimit::Unlimited)
    }
}

/// Configuration for a search run.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Candidate length in bytes
    pub byte_size: usize,
    /// Number of attempts
    pub tasks: TaskLimit,
    /// Characters candidates are drawn from
    pub charset: Charset,
    /// Compiler executable
    pub compiler: String,
    /// Extra compiler arguments, placed before `-c`
    pub compiler_args: Vec<String>,
    /// Per-attempt compile timeout
    pub timeout: Duration,
    /// Concurrent workers
    pub workers: usize,
    /// Where successful programs go
    pub output_dir: PathBuf,
    /// Print compiler errors for failed attempts
    pub show_errors: bool,
    /// Suppress progress lines
    pub quiet: bool,
    /// Master seed (if None, `CF_SEED` or random)
    pub seed: Option<u64>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            byte_size: 5,
            tasks: TaskLimit::Bounded(10_000),
            charset: Charset::default(),
            compiler: "gcc".to_string(),
            compiler_args: Vec::new(),
            timeout: Duration::from_secs(2),
            workers: num_cpus::get(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            show_errors: false,
            quiet: false,
            seed: None,
        }
    }
}

impl FinderConfig {
    /// Short smoke run.
    pub fn quick() -> Self {
        Self {
            byte_size: 3,
            tasks: TaskLimit::Bounded(1_000),
            timeout: Duration::from_secs(1),
            ..Default::default()
        }
    }

    /// Run until interrupted, with a generous timeout.
    pub fn thorough() -> Self {
        Self {
            tasks: TaskLimit::Unlimited,
            timeout: Duration::from_secs(10),
            ..Default::default()
        }
    }

    /// Reject settings no run can work with.
    pub fn validate(&self) -> Result<(), FinderError> {
        if self.workers == 0 {
            return Err(FinderError::InvalidConfig("workers must be at least 1".into()));
        }
        if self.timeout.is_zero() {
            return Err(FinderError::InvalidConfig("timeout must be positive".into()));
        }
        if self.compiler.trim().is_empty() {
            return Err(FinderError::InvalidConfig("compiler must not be empty".into()));
        }
        Ok(())
    }

    /// Size of the search space for this config.
    pub fn combinations(&self) -> f64 {
        combinations(self.charset.len(), self.byte_size)
    }
}

/// Errors that stop a run before it starts.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    #[error("Charset error: {0}")]
    Charset(#[from] CoreError),

    #[error("Seed error: {0}")]
    Seed(#[from] RandomError),

    #[error("Invalid task count {0} (use -1 for unlimited)")]
    InvalidTaskCount(i64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The search run.
pub struct Finder {
    shared: Arc<Shared>,
}

/// State every worker reads. Only the atomics and `stats` change.
struct Shared {
    config: FinderConfig,
    seed: u64,
    generator: CandidateGenerator,
    probe: CompilerProbe,
    output: OutputDir,
    stats: Stats,
    progress: Progress,
    next_task: AtomicU64,
    stop: AtomicBool,
    spawn_error_logged: AtomicBool,
}

impl Finder {
    /// Validate the config, resolve the seed and create the output directory.
    pub fn new(config: FinderConfig) -> Result<Self, FinderError> {
        config.validate()?;

        let seed = match config.seed {
            Some(seed) => seed,
            None => cf_random::seed_from_env_or_random()?,
        };

        let output =
            OutputDir::create(&config.output_dir).map_err(|source| FinderError::OutputDir {
                path: config.output_dir.clone(),
                source,
            })?;

        let generator = CandidateGenerator::new(config.charset.clone(), config.byte_size);
        let probe = CompilerProbe::new(config.compiler.clone(), config.timeout)
            .with_args(config.compiler_args.clone());

        let speed_interval = config
            .tasks
            .is_unlimited()
            .then(|| config.workers as u64 * SPEED_BATCH_PER_WORKER);
        let progress = Progress {
            show_errors: config.show_errors,
            speed_interval,
            quiet: config.quiet,
        };

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                seed,
                generator,
                probe,
                output,
                stats: Stats::default(),
                progress,
                next_task: AtomicU64::new(0),
                stop: AtomicBool::new(false),
                spawn_error_logged: AtomicBool::new(false),
            }),
        })
    }

    pub fn output_dir(&self) -> &Path {
        self.shared.output.path()
    }

    /// Run to completion, or until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        let config = &self.shared.config;
        tracing::info!(
            workers = config.workers,
            byte_size = config.byte_size,
            tasks = ?config.tasks,
            seed = self.shared.seed,
            "starting search"
        );
        self.shared.stats.start();

        let mut workers = JoinSet::new();
        for worker_id in 0..config.workers {
            let shared = Arc::clone(&self.shared);
            workers.spawn(async move { shared.worker_loop(worker_id).await });
        }

        tokio::pin!(shutdown);
        let mut interrupted = false;
        loop {
            tokio::select! {
                _ = &mut shutdown, if !interrupted => {
                    tracing::info!("shutdown requested, finishing in-flight attempts");
                    self.shared.stop.store(true, Ordering::SeqCst);
                    interrupted = true;
                }
                joined = workers.join_next() => match joined {
                    Some(Ok(())) => {}
                    Some(Err(e)) => tracing::error!(error = %e, "worker task failed"),
                    None => break,
                },
            }
        }

        let counts = self.shared.stats.snapshot();
        RunSummary::new(
            counts,
            self.shared.stats.elapsed(),
            config.combinations(),
            interrupted,
            self.shared.seed,
        )
    }
}

impl Shared {
    async fn worker_loop(&self, worker_id: usize) {
        tracing::debug!(worker_id, "worker started");

        while !self.stop.load(Ordering::SeqCst) {
            let task_id = self.next_task.fetch_add(1, Ordering::SeqCst);
            if !self.config.tasks.allows(task_id) {
                break;
            }
            self.attempt(task_id).await;
        }

        tracing::debug!(worker_id, "worker finished");
    }

    async fn attempt(&self, task_id: u64) {
        let mut rng = DeterministicRng::for_task(self.seed, task_id);
        let candidate = self.generator.generate(&mut rng);
        let source = template::embed(&candidate);

        let result = self.probe.probe(&source).await;
        self.log_outcome(task_id, &candidate, &result);

        // Only a source that just compiled is written.
        let saved = if result.is_success() {
            Some(self.output.save(&source).await)
        } else {
            None
        };

        let attempt = match &saved {
            Some(Ok(path)) => Attempt::Saved(path),
            Some(Err(e)) => {
                tracing::warn!(task_id, error = %e, "compiled but could not be saved");
                Attempt::SaveFailed(e)
            }
            None => Attempt::Rejected(&result),
        };

        self.stats.record(attempt.is_success(), |counts| {
            let rate = self.stats.rate(counts);
            self.progress.attempt(counts, &attempt, rate);
        });
    }

    fn log_outcome(&self, task_id: u64, candidate: &str, result: &CompileResult) {
        match &result.outcome {
            CompileOutcome::Success => {
                tracing::debug!(task_id, candidate, "compiled");
            }
            CompileOutcome::Failed { stderr } => {
                let error = first_error_line(stderr);
                tracing::trace!(task_id, candidate, error = %error, "rejected");
            }
            CompileOutcome::TimedOut { timeout } => {
                tracing::debug!(task_id, candidate, ?timeout, "compiler timed out");
            }
            CompileOutcome::Error { message } => {
                // A missing compiler fails every attempt the same way.
                if !self.spawn_error_logged.swap(true, Ordering::SeqCst) {
                    tracing::warn!(
                        compiler = %self.probe.compiler(),
                        error = %message,
                        "compiler could not be run"
                    );
                } else {
                    tracing::debug!(task_id, error = %message, "compiler could not be run");
                }
            }
        }
    }
}
