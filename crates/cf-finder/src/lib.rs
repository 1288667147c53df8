//! # cf-finder
//!
//! Parallel search for random byte strings that compile as C.
//!
//! Each attempt draws a candidate, embeds it in the program template,
//! and hands the result to an external compiler:
//!
//! | Outcome | Effect |
//! |---------|--------|
//! | exit 0 | saved as `{pid}_{token}.c`, counted as a success |
//! | exit ≠ 0 | discarded, counted as a failure |
//! | timeout | compiler killed, counted as a failure |
//! | cannot run | counted as a failure, logged once |
//!
//! # Usage
//!
//! ```bash
//! # 10,000 attempts of 5 bytes each
//! cf-find 5
//!
//! # Run until Ctrl-C with clang and a tiny charset
//! cf-find 4 --tasks -1 --compiler clang --charset '{};()x'
//! ```

pub mod compiler;
pub mod finder;
pub mod output;
pub mod result;
pub mod stats;
pub mod summary;

pub use compiler::CompilerProbe;
pub use finder::{Finder, FinderConfig, FinderError, TaskLimit};
pub use output::{OutputDir, DEFAULT_OUTPUT_DIR};
pub use result::{CompileOutcome, CompileResult};
pub use stats::{Attempt, Counts, Progress, Stats};
pub use summary::RunSummary;
