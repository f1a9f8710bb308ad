use std::{path::PathBuf, sync::Arc};

use chrono::Utc;
use tabled::Table;

use crate::{
    config, error,
    fetcher::YtDlpFetcher,
    info,
    management::{Persisted, RunRecordManager},
    runner::{self, BatchRunner, RunError},
    success,
    types::{BatchReport, FailureTableRow, RunRecord},
    warning,
};

/// Effective settings of one `run` invocation.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub workers: usize,
    pub music_dir: PathBuf,
    pub audio_format: String,
    pub audio_quality: u32,
    pub ytdlp_bin: String,
    /// Read the remainder file instead of the input list.
    pub retry: bool,
}

impl RunSettings {
    pub fn from_env() -> Self {
        Self {
            input: config::input_file(),
            output: config::output_file(),
            workers: config::workers(),
            music_dir: config::music_dir(),
            audio_format: config::audio_format(),
            audio_quality: config::audio_quality(),
            ytdlp_bin: config::ytdlp_bin(),
            retry: false,
        }
    }

    pub fn source(&self) -> &PathBuf {
        if self.retry { &self.output } else { &self.input }
    }
}

/// Downloads every entry of the track list and updates the remainder file.
///
/// Reads the list from `settings.input` (or from `settings.output` with
/// `--retry`), runs the batch with up to `settings.workers` parallel downloads
/// and prints a summary.
///
/// # Behavior
///
/// - **Missing input file**: prints a warning and returns without touching
///   the remainder file
/// - **Some entries failed**: the original lines are written to
///   `settings.output`, one per line, replacing older content
/// - **Everything succeeded**: a remainder file from an earlier run is deleted
/// - **Remainder file cannot be written**: fatal, exits with code 1
///
/// # Example Output
///
/// ```text
/// [o] Starting download of 2 tracks (up to 8 in parallel)
/// [o] [1/2] Processing: Artist B - Song Two
/// [✓] Downloaded: Artist B - Song Two (musicas/Artist B/Artist B - Song Two.mp3)
/// [o] [2/2] Processing: Artist A - Song One
/// [!] Failed to download: Artist A - Song One (downloader exited with status 1: ...)
/// [✓] Done! 1 tracks could not be downloaded and were saved to 'output.txt'
/// ```
pub async fn run(settings: RunSettings) {
    let source = settings.source().clone();
    info!("Reading track list from '{}'", source.display());

    let fetcher = YtDlpFetcher::new(settings.music_dir.clone())
        .with_program(settings.ytdlp_bin.clone())
        .with_audio(settings.audio_format.clone(), settings.audio_quality);
    info!(
        "Saving {} files to '{}'",
        settings.audio_format,
        fetcher.music_dir().display()
    );

    let runner = BatchRunner::new(Arc::new(fetcher), settings.workers);

    let (report, persisted) = match runner::run_file(&runner, &source, &settings.output).await {
        Ok(done) => done,
        Err(RunError::InputMissing(path)) => {
            warning!(
                "Input file '{}' not found! Expected one track per line as 'artist - track'.",
                path.display()
            );
            return;
        }
        Err(e) => error!("Cannot finish batch: {}", e),
    };

    print_summary(&report, persisted, &settings);

    let record = RunRecord {
        finished_at: Utc::now(),
        input: source,
        output: settings.output.clone(),
        workers: runner.workers(),
        total_lines: report.total_lines,
        malformed: report.malformed,
        attempted: report.attempted,
        succeeded: report.succeeded,
        unresolved: report.unresolved(),
    };
    if let Err(e) = RunRecordManager::new().persist(&record).await {
        warning!("Cannot save run summary. Err: {}", e);
    }
}

fn print_summary(report: &BatchReport, persisted: Persisted, settings: &RunSettings) {
    info!(
        "Processed {} lines: {} downloaded, {} unresolved",
        report.total_lines,
        report.succeeded,
        report.unresolved()
    );

    if report.unresolved() == 0 {
        if persisted == Persisted::RemovedStale {
            info!(
                "Removed remainder file '{}' from a previous run.",
                settings.output.display()
            );
        }
        success!("Done! All tracks were downloaded successfully.");
        return;
    }

    let rows: Vec<FailureTableRow> = report
        .diagnostics
        .iter()
        .map(|(line, reason)| FailureTableRow {
            line: line.clone(),
            reason: reason.clone(),
        })
        .collect();
    println!("{}", Table::new(rows));

    success!(
        "Done! {} tracks could not be downloaded and were saved to '{}'",
        report.unresolved(),
        settings.output.display()
    );
}
