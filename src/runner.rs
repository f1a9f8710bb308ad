//! # Batch Job Runner
//!
//! Runs one download job per well-formed input line on a bounded worker pool
//! and collects every line that did not end in a downloaded file.
//!
//! ## Flow
//!
//! ```text
//! lines ──parse──┬── malformed ───────────────────────────────┐
//!                └── WorkItems ──JoinSet + Semaphore(W)──┐     │
//!                                                        ▼     ▼
//!                                   join_next() ──► FailureList ──► remainder file
//! ```
//!
//! - At most `W` jobs hold a semaphore permit, and only a permit holder calls
//!   the [`Fetcher`]. The semaphore hands out permits in FIFO order so every
//!   queued job eventually runs.
//! - Each job runs the fetcher in its own task. A fetcher error or a panic is
//!   turned into [`JobOutcome::Failure`] inside the job, so the join loop only
//!   ever sees finished [`JobResult`]s.
//! - The join loop is the single consumer of results. Failures are appended in
//!   completion order after the malformed lines.
//! - There is no cancellation and no runner-level timeout. The runner returns
//!   once every dispatched job reached a terminal state.

use std::{
    fmt, io,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    fetcher::Fetcher,
    info,
    management::{FailureListError, FailureListManager, Persisted},
    success,
    types::{BatchReport, JobOutcome, JobResult, WorkItem},
    utils, warning,
};

pub const MALFORMED_REASON: &str = "invalid format (expected: 'artist - track')";

#[derive(Debug)]
pub enum RunError {
    InputMissing(PathBuf),
    InputError { path: PathBuf, source: io::Error },
    OutputError(FailureListError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::InputMissing(path) => {
                write!(f, "input file '{}' not found", path.display())
            }
            RunError::InputError { path, source } => {
                write!(f, "cannot read input file '{}': {}", path.display(), source)
            }
            RunError::OutputError(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<FailureListError> for RunError {
    fn from(err: FailureListError) -> Self {
        RunError::OutputError(err)
    }
}

pub struct BatchRunner {
    fetcher: Arc<dyn Fetcher>,
    workers: usize,
    show_progress: bool,
}

impl BatchRunner {
    /// `workers` is clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn new(fetcher: Arc<dyn Fetcher>, workers: usize) -> Self {
        Self {
            fetcher,
            workers: workers.clamp(1, Semaphore::MAX_PERMITS),
            show_progress: true,
        }
    }

    /// Disables the progress bar. Per-item lines are still printed.
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn run<S: AsRef<str>>(&self, lines: &[S]) -> BatchReport {
        let (items, malformed) = utils::parse_lines(lines);

        let mut report = BatchReport {
            total_lines: lines.len(),
            malformed: malformed.len(),
            attempted: items.len(),
            ..BatchReport::default()
        };

        for line in malformed {
            warning!("Invalid format: '{}' (expected: 'artist - track')", line);
            report
                .diagnostics
                .push((line.clone(), MALFORMED_REASON.to_string()));
            report.failures.push(line);
        }

        let total = items.len();
        info!(
            "Starting download of {} tracks (up to {} in parallel)",
            total, self.workers
        );

        let pb = self.progress_bar(total);
        let mut jobs = self.dispatch(&items);
        let mut reported = vec![false; total];
        let mut completed = 0;

        while let Some(joined) = jobs.join_next().await {
            let (index, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    // the item is recorded as failed after the loop
                    completed += 1;
                    pb.inc(1);
                    pb.suspend(|| {
                        warning!("[{}/{}] Worker task failed: {}", completed, total, e)
                    });
                    continue;
                }
            };
            reported[index] = true;
            completed += 1;

            pb.inc(1);
            pb.set_message(result.item.line.clone());
            pb.suspend(|| report_completion(completed, total, &result));
            record(&mut report, result);
        }

        for (index, item) in items.iter().enumerate() {
            if !reported[index] {
                report
                    .diagnostics
                    .push((item.line.clone(), "job did not report a result".to_string()));
                report.failures.push(item.line.clone());
            }
        }

        pb.finish_and_clear();
        report
    }

    fn dispatch(&self, items: &[WorkItem]) -> JoinSet<(usize, JobResult)> {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut jobs = JoinSet::new();

        for (index, item) in items.iter().cloned().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&self.fetcher);

            jobs.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        let outcome = JobOutcome::Failure(format!("worker pool closed: {e}"));
                        return (index, JobResult { item, outcome });
                    }
                };

                let job_item = item.clone();
                let handle = tokio::spawn(async move { fetcher.fetch(&job_item).await });
                let outcome = match handle.await {
                    Ok(Ok(path)) => JobOutcome::Success(path),
                    Ok(Err(e)) => JobOutcome::Failure(e.to_string()),
                    Err(e) => JobOutcome::Failure(format!("unexpected fault: {e}")),
                };

                (index, JobResult { item, outcome })
            });
        }

        jobs
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.blue} [{pos}/{len}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb
    }
}

fn report_completion(index: usize, total: usize, result: &JobResult) {
    info!(
        "[{}/{}] Processing: {} - {}",
        index, total, result.item.artist, result.item.track
    );
    match &result.outcome {
        JobOutcome::Success(path) => success!(
            "Downloaded: {} - {} ({})",
            result.item.artist,
            result.item.track,
            path.display()
        ),
        JobOutcome::Failure(reason) => warning!(
            "Failed to download: {} - {} ({})",
            result.item.artist,
            result.item.track,
            reason
        ),
    }
}

fn record(report: &mut BatchReport, result: JobResult) {
    match result.outcome {
        JobOutcome::Success(_) => report.succeeded += 1,
        JobOutcome::Failure(reason) => {
            report.diagnostics.push((result.item.line.clone(), reason));
            report.failures.push(result.item.line);
        }
    }
}

/// Processes an input list file end to end and updates the remainder file.
///
/// A missing input file aborts before anything is dispatched and leaves the
/// remainder file untouched. Otherwise the failures are written to `output`,
/// or a stale `output` from an earlier run is removed when nothing failed.
pub async fn run_file(
    runner: &BatchRunner,
    input: &Path,
    output: &Path,
) -> Result<(BatchReport, Persisted), RunError> {
    if !input.is_file() {
        return Err(RunError::InputMissing(input.to_path_buf()));
    }

    let content = async_fs::read_to_string(input)
        .await
        .map_err(|source| RunError::InputError {
            path: input.to_path_buf(),
            source,
        })?;
    let lines: Vec<&str> = content.lines().collect();

    let report = runner.run(&lines).await;
    let persisted = FailureListManager::new(output)
        .persist(&report.failures)
        .await?;

    Ok((report, persisted))
}
