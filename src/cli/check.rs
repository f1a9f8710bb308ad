use crate::{config, error, fetcher, success, warning};

/// Verifies that the downloader and the transcoder can be started.
///
/// Runs `yt-dlp --version` and `ffmpeg -version` (or the binaries configured
/// through `TRACKFETCH_YTDLP_BIN` / `TRACKFETCH_FFMPEG_BIN`) and prints the
/// reported version of each. Exits with code 1 when one of them is missing.
pub async fn check() {
    let statuses = fetcher::check_tools(&config::ytdlp_bin(), &config::ffmpeg_bin()).await;

    let mut missing = 0;
    for status in &statuses {
        match &status.version {
            Ok(version) => success!("{}: {}", status.program, version),
            Err(e) => {
                missing += 1;
                warning!("{}: {}", status.program, e);
            }
        }
    }

    if missing > 0 {
        error!("{} required tool(s) unavailable.", missing);
    }
}
