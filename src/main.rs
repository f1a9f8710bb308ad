use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use trackfetch::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Download every track of the list and save the failures for retry
    Run(RunOptions),

    /// Check that yt-dlp and ffmpeg are available
    Check,

    /// Show the summary of the last run
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RunOptions {
    /// Track list, one "artist - track" per line [default: input.txt]
    #[clap(long, short)]
    pub input: Option<PathBuf>,

    /// Remainder file for entries that failed [default: output.txt]
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Maximum number of simultaneous downloads [default: 8]
    #[clap(long, short, value_parser = clap::value_parser!(u64).range(1..))]
    pub workers: Option<u64>,

    /// Directory the artist folders are created in [default: musicas]
    #[clap(long)]
    pub dir: Option<PathBuf>,

    /// Target audio codec [default: mp3]
    #[clap(long)]
    pub format: Option<String>,

    /// Target bitrate in kbps [default: 192]
    #[clap(long)]
    pub quality: Option<u32>,

    /// Process the entries of the remainder file instead of the track list
    #[clap(long, conflicts_with = "input")]
    pub retry: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

impl RunOptions {
    fn into_settings(self) -> cli::RunSettings {
        let mut settings = cli::RunSettings::from_env();
        if let Some(input) = self.input {
            settings.input = input;
        }
        if let Some(output) = self.output {
            settings.output = output;
        }
        if let Some(workers) = self.workers {
            settings.workers = usize::try_from(workers).unwrap_or(usize::MAX);
        }
        if let Some(dir) = self.dir {
            settings.music_dir = dir;
        }
        if let Some(format) = self.format {
            settings.audio_format = format;
        }
        if let Some(quality) = self.quality {
            settings.audio_quality = quality;
        }
        settings.retry = self.retry;
        settings
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Run(opt) => cli::run(opt.into_settings()).await,
        Command::Check => cli::check().await,
        Command::Info => cli::info().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
