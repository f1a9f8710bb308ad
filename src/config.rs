//! Configuration management for the batch track downloader.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Every value has a default so the
//! tool runs without any configuration at all.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command-line flags (highest priority, applied by the `run` command)
//! 2. Environment variables
//! 3. `.env` file in the local data directory
//! 4. Application defaults

use dotenv;
use std::{env, path::PathBuf};

pub const DEFAULT_INPUT_FILE: &str = "input.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "output.txt";
pub const DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_MUSIC_DIR: &str = "musicas";
pub const DEFAULT_AUDIO_FORMAT: &str = "mp3";
pub const DEFAULT_AUDIO_QUALITY: u32 = 192;
pub const DEFAULT_YTDLP_BIN: &str = "yt-dlp";
pub const DEFAULT_FFMPEG_BIN: &str = "ffmpeg";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `trackfetch` data directory if it doesn't exist and loads the
/// `.env` file inside it when present. A missing `.env` file is not an error:
/// all settings fall back to their defaults.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/trackfetch/.env`
/// - macOS: `~/Library/Application Support/trackfetch/.env`
/// - Windows: `%LOCALAPPDATA%/trackfetch/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - The `.env` file exists but cannot be read or parsed
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the application's directory inside the platform local data dir.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("trackfetch");
    path
}

/// Returns the input list path (`TRACKFETCH_INPUT`, default `input.txt`).
pub fn input_file() -> PathBuf {
    PathBuf::from(env_or("TRACKFETCH_INPUT", DEFAULT_INPUT_FILE))
}

/// Returns the remainder file path (`TRACKFETCH_OUTPUT`, default `output.txt`).
pub fn output_file() -> PathBuf {
    PathBuf::from(env_or("TRACKFETCH_OUTPUT", DEFAULT_OUTPUT_FILE))
}

/// Returns the maximum number of simultaneous downloads.
///
/// Reads `TRACKFETCH_WORKERS`. Unparsable or zero values fall back to
/// [`DEFAULT_WORKERS`].
pub fn workers() -> usize {
    env::var("TRACKFETCH_WORKERS")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|w| *w > 0)
        .unwrap_or(DEFAULT_WORKERS)
}

/// Returns the root directory downloads are stored under.
pub fn music_dir() -> PathBuf {
    PathBuf::from(env_or("TRACKFETCH_MUSIC_DIR", DEFAULT_MUSIC_DIR))
}

/// Returns the target audio codec passed to the downloader (e.g. `mp3`).
pub fn audio_format() -> String {
    env_or("TRACKFETCH_AUDIO_FORMAT", DEFAULT_AUDIO_FORMAT)
}

/// Returns the target bitrate in kbps.
pub fn audio_quality() -> u32 {
    env::var("TRACKFETCH_AUDIO_QUALITY")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(DEFAULT_AUDIO_QUALITY)
}

pub fn ytdlp_bin() -> String {
    env_or("TRACKFETCH_YTDLP_BIN", DEFAULT_YTDLP_BIN)
}

pub fn ffmpeg_bin() -> String {
    env_or("TRACKFETCH_FFMPEG_BIN", DEFAULT_FFMPEG_BIN)
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}
