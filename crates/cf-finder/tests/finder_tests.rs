//! End-to-end runs with stand-in compilers.
//!
//! `true` accepts everything, `false` rejects everything, and `sh -c`
//! scripts give finer control: with extra args `["-c", SCRIPT]` the probe
//! runs `sh -c SCRIPT -c <src> -o <obj>`, so the script sees the source
//! path as `$1`.
#![cfg(unix)]

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use cf_core::{template, Charset};
use cf_finder::{Finder, FinderConfig, TaskLimit};

fn config(out: &Path, compiler: &str, tasks: u64) -> FinderConfig {
    FinderConfig {
        byte_size: 4,
        tasks: TaskLimit::Bounded(tasks),
        compiler: compiler.to_string(),
        timeout: Duration::from_secs(10),
        workers: 4,
        output_dir: out.to_path_buf(),
        quiet: true,
        seed: Some(12345),
        ..Default::default()
    }
}

fn saved_files(dir: &Path) -> Vec<std::path::PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_exact_attempt_count() {
    let out = tempfile::tempdir().unwrap();
    let finder = Finder::new(config(out.path(), "false", 37)).unwrap();

    let summary = finder.run(std::future::pending()).await;

    assert_eq!(summary.counts.attempts, 37);
    assert_eq!(summary.counts.failures, 37);
    assert_eq!(summary.counts.successes, 0);
    assert!(!summary.interrupted);
    assert!(saved_files(out.path()).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_zero_tasks() {
    let out = tempfile::tempdir().unwrap();
    let finder = Finder::new(config(out.path(), "true", 0)).unwrap();

    let summary = finder.run(std::future::pending()).await;
    assert_eq!(summary.counts.attempts, 0);
    assert_eq!(summary.exhaustive_secs, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_success_saved_with_unique_name() {
    let out = tempfile::tempdir().unwrap();
    let finder = Finder::new(config(out.path(), "true", 25)).unwrap();

    let summary = finder.run(std::future::pending()).await;
    assert_eq!(summary.counts.successes, 25);

    let files = saved_files(out.path());
    assert_eq!(files.len(), 25);

    let pid_prefix = format!("{}_", std::process::id());
    let names: HashSet<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 25);
    for name in &names {
        assert!(name.starts_with(&pid_prefix), "{}", name);
        assert!(name.ends_with(".c"), "{}", name);
    }

    let charset = Charset::default();
    for file in &files {
        let source = fs::read_to_string(file).unwrap();
        let candidate = template::extract(&source).expect("saved file is a templated program");
        assert_eq!(candidate.len(), 4);
        assert!(candidate.bytes().all(|b| charset.contains(b)));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_only_accepted_candidates_saved() {
    let out = tempfile::tempdir().unwrap();
    // The template itself has no capital letters, so this accepts exactly
    // the candidates containing an X.
    let cfg = FinderConfig {
        byte_size: 2,
        charset: Charset::from_chars("XY").unwrap(),
        compiler: "sh".to_string(),
        compiler_args: vec!["-c".to_string(), "grep -q X \"$1\"".to_string()],
        ..config(out.path(), "sh", 60)
    };
    let finder = Finder::new(cfg).unwrap();

    let summary = finder.run(std::future::pending()).await;
    assert_eq!(summary.counts.attempts, 60);
    assert_eq!(
        summary.counts.attempts,
        summary.counts.successes + summary.counts.failures
    );

    let files = saved_files(out.path());
    assert_eq!(files.len() as u64, summary.counts.successes);
    for file in files {
        let source = fs::read_to_string(&file).unwrap();
        let candidate = template::extract(&source).unwrap();
        assert!(candidate.contains('X'), "{:?} should not have been saved", candidate);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_seed_same_results() {
    let accept_x = |out: &Path| FinderConfig {
        byte_size: 3,
        charset: Charset::from_chars("XYZ").unwrap(),
        compiler_args: vec!["-c".to_string(), "grep -q X \"$1\"".to_string()],
        ..config(out, "sh", 40)
    };

    let out_a = tempfile::tempdir().unwrap();
    let out_b = tempfile::tempdir().unwrap();
    let a = Finder::new(accept_x(out_a.path())).unwrap().run(std::future::pending()).await;
    let b = Finder::new(accept_x(out_b.path())).unwrap().run(std::future::pending()).await;

    assert_eq!(a.counts, b.counts);

    let candidates = |dir: &Path| -> Vec<String> {
        let mut found: Vec<String> = saved_files(dir)
            .iter()
            .map(|p| {
                let source = fs::read_to_string(p).unwrap();
                template::extract(&source).unwrap().to_string()
            })
            .collect();
        found.sort();
        found
    };
    assert_eq!(candidates(out_a.path()), candidates(out_b.path()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_timeouts_count_as_failures() {
    let out = tempfile::tempdir().unwrap();
    let cfg = FinderConfig {
        compiler_args: vec!["-c".to_string(), "sleep 10".to_string()],
        timeout: Duration::from_millis(100),
        ..config(out.path(), "sh", 8)
    };
    let finder = Finder::new(cfg).unwrap();

    let summary = finder.run(std::future::pending()).await;
    assert_eq!(summary.counts.attempts, 8);
    assert_eq!(summary.counts.failures, 8);
    assert!(saved_files(out.path()).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_missing_compiler_counts_failures() {
    let out = tempfile::tempdir().unwrap();
    let finder = Finder::new(config(out.path(), "cf-no-such-compiler-xyz", 12)).unwrap();

    let summary = finder.run(std::future::pending()).await;
    assert_eq!(summary.counts.attempts, 12);
    assert_eq!(summary.counts.failures, 12);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unlimited_stops_on_shutdown() {
    let out = tempfile::tempdir().unwrap();
    let cfg = FinderConfig {
        tasks: TaskLimit::Unlimited,
        ..config(out.path(), "false", 0)
    };
    let finder = Finder::new(cfg).unwrap();

    let summary = finder
        .run(tokio::time::sleep(Duration::from_millis(300)))
        .await;

    assert!(summary.interrupted);
    assert!(summary.counts.attempts > 0);
    assert_eq!(
        summary.counts.attempts,
        summary.counts.successes + summary.counts.failures
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unsaved_success_counts_as_failure() {
    let root = tempfile::tempdir().unwrap();
    let out = root.path().join("vanishing");
    let finder = Finder::new(config(&out, "true", 6)).unwrap();

    // The directory exists after setup; take it away so every save fails.
    fs::remove_dir(&out).unwrap();

    let summary = finder.run(std::future::pending()).await;
    assert_eq!(summary.counts.attempts, 6);
    assert_eq!(summary.counts.successes, 0);
    assert_eq!(summary.counts.failures, 6);
    assert!(!out.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_clock_starts_with_run() {
    let out = tempfile::tempdir().unwrap();
    let finder = Finder::new(config(out.path(), "true", 0)).unwrap();

    tokio::time::sleep(Duration::from_millis(300)).await;
    let summary = finder.run(std::future::pending()).await;

    assert!(summary.elapsed_secs < 0.3, "elapsed {}", summary.elapsed_secs);
}

#[test]
fn test_output_dir_created() {
    let root = tempfile::tempdir().unwrap();
    let nested = root.path().join("runs").join("first");
    let finder = Finder::new(config(&nested, "true", 1)).unwrap();
    assert!(nested.is_dir());
    assert_eq!(finder.output_dir(), nested.as_path());
}
