//! # CLI Module
//!
//! This module provides the command-line interface layer for trackfetch. It
//! implements all user-facing commands and coordinates between the batch
//! runner, the downloader and the persisted artifacts.
//!
//! ## Commands
//!
//! - [`run`] - Downloads every entry of the track list and writes the remainder file
//! - [`check`] - Verifies that `yt-dlp` and `ffmpeg` can be started
//! - [`info`] - Shows the summary of the last run
//!
//! ## Architecture Design
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Runner (Bounded worker pool, result collection)
//!     ↓
//! Fetcher (yt-dlp + ffmpeg)
//! ```
//!
//! ## Error Handling Philosophy
//!
//! - **Item Isolation**: A failed or malformed entry never stops the batch
//! - **Graceful Exit**: A missing input file ends the command with a message
//! - **Fatal Environment Faults**: An unwritable remainder file ends the
//!   program with exit code 1
//!
//! ## Usage Patterns
//!
//! ```bash
//! trackfetch run                              # input.txt -> musicas/, failures -> output.txt
//! trackfetch run --workers 4 --format opus    # fewer parallel downloads, other codec
//! trackfetch run --retry                      # retry the entries left in output.txt
//! trackfetch check                            # verify external tools
//! trackfetch info                             # summary of the last run
//! ```

mod check;
mod info;
mod run;

pub use check::check;
pub use info::info;
pub use run::RunSettings;
pub use run::run;
