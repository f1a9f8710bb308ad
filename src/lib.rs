//! Batch Track Downloader Library
//!
//! This library provides the building blocks of the `trackfetch` CLI: reading a
//! list of `"artist - track"` lines, downloading every entry as an audio file
//! through an external downloader, and keeping the entries that could not be
//! resolved in a remainder file for a later retry.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `fetcher` - The download-and-convert collaborator (`yt-dlp`)
//! - `management` - Persisted artifacts (remainder file, last run record)
//! - `runner` - The bounded-concurrency batch job runner
//! - `types` - Data structures and type definitions
//! - `utils` - Line parsing and file naming helpers
//!
//! # Example
//!
//! ```
//! use trackfetch::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> trackfetch::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod fetcher;
pub mod management;
pub mod runner;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern for top-level plumbing using a
/// boxed dynamic error trait object that keeps the Send + Sync bounds needed
/// across tokio tasks.
///
/// # Example
///
/// ```
/// use trackfetch::Res;
///
/// async fn read_list() -> Res<String> {
///     Ok("Artist - Track".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// The macro accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// info!("Reading {}", path.display());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// The macro accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// success!("Downloaded: {} - {}", artist, track);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the program with exit code 1 after printing. Only the top-level
/// command handlers use this, for environment faults such as an unwritable
/// output file. Individual download jobs never call it.
///
/// # Example
///
/// ```
/// error!("Cannot write remainder file {}: {}", path.display(), e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues such as a malformed input line or a failed
/// download that does not stop the batch.
///
/// # Example
///
/// ```
/// warning!("Invalid format: '{}'", line);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
