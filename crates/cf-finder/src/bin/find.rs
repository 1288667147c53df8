//! CLI for searching random C snippets that compile.
//!
//! # Usage
//!
//! ```bash
//! # 10,000 attempts with 5-byte candidates
//! cargo run -p cf-finder --bin cf-find -- 5
//!
//! # Unlimited, show compiler errors, reproducible
//! cargo run -p cf-finder --bin cf-find -- 3 --tasks -1 --show-errors --seed 42
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use cf_core::{format_large_number, Charset, CharsetOptions};
use cf_finder::{Finder, FinderConfig, FinderError, TaskLimit, DEFAULT_OUTPUT_DIR};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CHARSET_PREVIEW_MAX: usize = 50;

/// Random C code compiler tester.
#[derive(Debug, Parser)]
#[command(name = "cf-find", version, about)]
struct Cli {
    /// Byte size of each candidate
    #[arg(default_value_t = 5)]
    byte_size: usize,

    /// Number of attempts (-1: unlimited)
    #[arg(long, default_value_t = 10_000, allow_negative_numbers = true)]
    tasks: i64,

    /// Exclude lowercase letters
    #[arg(long)]
    no_lowercase: bool,

    /// Exclude uppercase letters
    #[arg(long)]
    no_uppercase: bool,

    /// Exclude digits
    #[arg(long)]
    no_digits: bool,

    /// Exclude symbols
    #[arg(long)]
    no_symbols: bool,

    /// Include whitespace characters
    #[arg(long)]
    whitespace: bool,

    /// Custom character set (overrides the other charset options)
    #[arg(long)]
    charset: Option<String>,

    /// Compiler to use
    #[arg(long, default_value = "gcc")]
    compiler: String,

    /// Extra compiler argument, placed before `-c` (repeatable)
    #[arg(long = "compiler-arg", value_name = "ARG", allow_hyphen_values = true)]
    compiler_args: Vec<String>,

    /// Show compilation error messages
    #[arg(long)]
    show_errors: bool,

    /// Compilation timeout in seconds
    #[arg(long, default_value_t = 2)]
    timeout: u64,

    /// Concurrent workers (default: number of CPUs)
    #[arg(long)]
    workers: Option<usize>,

    /// Directory for programs that compiled
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Master seed (default: $CF_SEED or random)
    #[arg(long)]
    seed: Option<u64>,

    /// Smoke-run preset: 3 bytes, 1000 attempts, 1s timeout
    #[arg(long, conflicts_with = "thorough")]
    quick: bool,

    /// Run-forever preset with a 10s timeout
    #[arg(long)]
    thorough: bool,

    /// Print the final summary as JSON and suppress progress lines
    #[arg(long)]
    json: bool,

    /// Log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn charset_options(&self) -> CharsetOptions {
        CharsetOptions {
            lowercase: !self.no_lowercase,
            uppercase: !self.no_uppercase,
            digits: !self.no_digits,
            symbols: !self.no_symbols,
            whitespace: self.whitespace,
            custom: self.charset.clone(),
        }
    }

    /// Build the run config. A preset replaces size, task count and timeout;
    /// every other flag applies on top.
    fn to_config(&self) -> Result<FinderConfig, FinderError> {
        let mut config = if self.quick {
            FinderConfig::quick()
        } else if self.thorough {
            FinderConfig::thorough()
        } else {
            FinderConfig {
                byte_size: self.byte_size,
                tasks: TaskLimit::from_cli(self.tasks)?,
                timeout: Duration::from_secs(self.timeout),
                ..Default::default()
            }
        };

        config.charset = Charset::from_options(&self.charset_options())?;
        config.compiler = self.compiler.clone();
        config.compiler_args = self.compiler_args.clone();
        config.output_dir = self.output_dir.clone();
        config.show_errors = self.show_errors;
        config.quiet = self.json;
        config.seed = self.seed;
        if let Some(workers) = self.workers {
            config.workers = workers;
        }

        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_banner(config: &FinderConfig) {
    println!(
        "Starting random C code compilation test with {} bytes",
        config.byte_size
    );
    println!("Character set size: {} characters", config.charset.len());
    println!("Character set: {}", config.charset.preview(CHARSET_PREVIEW_MAX));
    println!("Compiler: {}", config.compiler);
    println!(
        "Total possible combinations: {}",
        format_large_number(config.combinations())
    );
    println!("Workers: {} (available CPU cores: {})", config.workers, num_cpus::get());

    if config.tasks.is_unlimited() {
        println!("Running in unlimited task mode... (Press Ctrl+C to stop)");
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl+C, run will not stop early");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if !cli.json {
        print_banner(&config);
    }

    let finder = match Finder::new(config) {
        Ok(finder) => finder,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if !cli.json {
        println!("Saving to: {}", finder.output_dir().display());
    }

    let summary = finder.run(ctrl_c()).await;

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to serialize summary: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", summary.format_report());
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cf-find").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).to_config().unwrap();
        assert_eq!(config.byte_size, 5);
        assert_eq!(config.tasks, TaskLimit::Bounded(10_000));
        assert_eq!(config.compiler, "gcc");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.output_dir, PathBuf::from("successful_codes"));
        assert_eq!(config.charset, Charset::default());
    }

    #[test]
    fn test_unlimited_tasks() {
        let config = parse(&["3", "--tasks", "-1"]).to_config().unwrap();
        assert_eq!(config.byte_size, 3);
        assert!(config.tasks.is_unlimited());
    }

    #[test]
    fn test_bad_task_count() {
        let err = parse(&["--tasks", "-5"]).to_config().unwrap_err();
        assert!(matches!(err, FinderError::InvalidTaskCount(-5)));
    }

    #[test]
    fn test_charset_flags() {
        let config = parse(&["--no-lowercase", "--no-uppercase", "--no-symbols"])
            .to_config()
            .unwrap();
        assert_eq!(config.charset.as_bytes(), b"0123456789");

        let custom = parse(&["--charset", "{};"]).to_config().unwrap();
        assert_eq!(custom.charset.as_bytes(), b"{};");
    }

    #[test]
    fn test_empty_charset_is_an_error() {
        let err = parse(&[
            "--no-lowercase",
            "--no-uppercase",
            "--no-digits",
            "--no-symbols",
        ])
        .to_config()
        .unwrap_err();
        assert!(matches!(err, FinderError::Charset(_)));
    }

    #[test]
    fn test_compiler_args_allow_hyphens() {
        let config = parse(&["--compiler-arg", "-w", "--compiler-arg", "-std=c99"])
            .to_config()
            .unwrap();
        assert_eq!(config.compiler_args, vec!["-w", "-std=c99"]);
    }

    #[test]
    fn test_json_is_quiet() {
        let config = parse(&["--json"]).to_config().unwrap();
        assert!(config.quiet);
    }

    #[test]
    fn test_presets() {
        let quick = parse(&["--quick"]).to_config().unwrap();
        assert_eq!(quick.tasks, TaskLimit::Bounded(1_000));
        assert_eq!(quick.byte_size, 3);

        let thorough = parse(&["--thorough", "--workers", "2"]).to_config().unwrap();
        assert!(thorough.tasks.is_unlimited());
        assert_eq!(thorough.workers, 2);

        assert!(Cli::try_parse_from(["cf-find", "--quick", "--thorough"]).is_err());
    }
}
