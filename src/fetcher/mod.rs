//! # Fetcher Module
//!
//! The seam between the batch runner and the external search, download and
//! transcode engine. The runner only knows the [`Fetcher`] trait: given one
//! [`WorkItem`] it either yields the path of the finished audio file or a
//! [`FetchError`]. Everything in between (searching, picking the best audio
//! stream, downloading, transcoding) belongs to the implementation.
//!
//! [`YtDlpFetcher`] is the production implementation. It shells out to
//! `yt-dlp`, which in turn drives `ffmpeg` for the audio extraction.

mod ytdlp;

use std::{fmt, io, path::PathBuf, process::Stdio};

use async_trait::async_trait;
use tokio::process::Command;

use crate::types::WorkItem;

pub use ytdlp::YtDlpFetcher;

#[derive(Debug)]
pub enum FetchError {
    IoError(io::Error),
    SpawnError { program: String, source: io::Error },
    ProcessError { code: Option<i32>, message: String },
    MissingOutput(PathBuf),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::IoError(e) => write!(f, "io error: {e}"),
            FetchError::SpawnError { program, source } => {
                write!(f, "cannot start {program}: {source}")
            }
            FetchError::ProcessError { code, message } => match code {
                Some(code) => write!(f, "downloader exited with status {code}: {message}"),
                None => write!(f, "downloader terminated by signal: {message}"),
            },
            FetchError::MissingOutput(path) => {
                write!(f, "no audio file produced at {}", path.display())
            }
        }
    }
}

impl std::error::Error for FetchError {}

impl From<io::Error> for FetchError {
    fn from(err: io::Error) -> Self {
        FetchError::IoError(err)
    }
}

/// Download-and-convert contract used by the batch runner.
///
/// Implementations must be safe to call concurrently for any mix of items,
/// including several items by the same artist. Failures are reported through
/// the returned error and must never terminate the process.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, item: &WorkItem) -> Result<PathBuf, FetchError>;
}

/// Availability of one external tool.
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub program: String,
    pub version: Result<String, String>,
}

/// Checks that the downloader and the transcoder can be started.
pub async fn check_tools(ytdlp_bin: &str, ffmpeg_bin: &str) -> Vec<ToolStatus> {
    let mut statuses = Vec::new();
    for (program, flag) in [(ytdlp_bin, "--version"), (ffmpeg_bin, "-version")] {
        statuses.push(ToolStatus {
            program: program.to_string(),
            version: tool_version(program, flag).await.map_err(|e| e.to_string()),
        });
    }
    statuses
}

async fn tool_version(program: &str, flag: &str) -> Result<String, FetchError> {
    let output = Command::new(program)
        .arg(flag)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| FetchError::SpawnError {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(FetchError::ProcessError {
            code: output.status.code(),
            message: last_line(&output.stderr),
        });
    }

    Ok(first_line(&output.stdout))
}

pub(crate) fn first_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn last_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .unwrap_or("no diagnostic output")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_line_skips_trailing_blank_lines() {
        let stderr = b"WARNING: something\nERROR: [youtube] abc: Video unavailable\n\n";
        assert_eq!(last_line(stderr), "ERROR: [youtube] abc: Video unavailable");
    }

    #[test]
    fn last_line_of_empty_output_has_placeholder() {
        assert_eq!(last_line(b""), "no diagnostic output");
    }

    #[test]
    fn first_line_returns_version_line() {
        assert_eq!(first_line(b"\n2025.01.15\nextra"), "2025.01.15");
    }

    #[tokio::test]
    async fn missing_tool_is_reported_not_raised() {
        let statuses = check_tools("trackfetch-no-such-tool", "trackfetch-no-such-ffmpeg").await;
        assert_eq!(statuses.len(), 2);
        assert!(statuses.iter().all(|s| s.version.is_err()));
    }
}
