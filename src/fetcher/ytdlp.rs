use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::Command;

use super::{FetchError, Fetcher, last_line};
use crate::{config, types::WorkItem, utils};

/// Downloads the best audio stream for a search query with `yt-dlp` and lets
/// its ffmpeg post-processor transcode it to the configured codec.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    music_dir: PathBuf,
    program: String,
    audio_format: String,
    audio_quality: u32,
}

impl YtDlpFetcher {
    pub fn new(music_dir: PathBuf) -> Self {
        Self {
            music_dir,
            program: config::DEFAULT_YTDLP_BIN.to_string(),
            audio_format: config::DEFAULT_AUDIO_FORMAT.to_string(),
            audio_quality: config::DEFAULT_AUDIO_QUALITY,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_audio(mut self, format: impl Into<String>, quality: u32) -> Self {
        self.audio_format = format.into();
        self.audio_quality = quality;
        self
    }

    pub fn music_dir(&self) -> &Path {
        &self.music_dir
    }

    /// Arguments for one download. Only the first search hit is fetched.
    pub fn build_args(&self, item: &WorkItem) -> Vec<String> {
        let template = utils::output_template(&self.music_dir, item);
        vec![
            format!("ytsearch1:{}", utils::search_query(item)),
            "--format".to_string(),
            "bestaudio/best".to_string(),
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            self.audio_format.clone(),
            "--audio-quality".to_string(),
            format!("{}K", self.audio_quality),
            "--output".to_string(),
            template.to_string_lossy().into_owned(),
            "--no-playlist".to_string(),
            "--quiet".to_string(),
            "--no-warnings".to_string(),
            "--no-progress".to_string(),
            "--ignore-errors".to_string(),
        ]
    }

    /// Finds the file the downloader produced for `item`.
    ///
    /// Known codecs map to a fixed extension. For `best` and codecs without a
    /// mapping the source extension is unknown, so any finished file named
    /// `<artist> - <track>.<ext>` in the artist directory counts.
    pub async fn locate_output(&self, item: &WorkItem) -> Result<PathBuf, FetchError> {
        let expected = utils::output_file(&self.music_dir, item, extension_for(&self.audio_format));
        if async_fs::metadata(&expected).await.is_ok() {
            return Ok(expected);
        }
        if is_known_codec(&self.audio_format) {
            return Err(FetchError::MissingOutput(expected));
        }

        let stem = utils::output_stem(item);
        let dir = utils::artist_dir(&self.music_dir, &item.artist);

        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let finished = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| !PARTIAL_EXTENSIONS.contains(&e));
            let same_track = path.file_stem().and_then(|s| s.to_str()) == Some(stem.as_str());
            if finished && same_track && path.is_file() {
                return Ok(path);
            }
        }

        Err(FetchError::MissingOutput(expected))
    }
}

const KNOWN_CODECS: [&str; 8] = ["aac", "alac", "flac", "m4a", "mp3", "opus", "vorbis", "wav"];
const PARTIAL_EXTENSIONS: [&str; 4] = ["part", "ytdl", "temp", "tmp"];

fn is_known_codec(format: &str) -> bool {
    KNOWN_CODECS.contains(&format)
}

#[async_trait]
impl Fetcher for YtDlpFetcher {
    async fn fetch(&self, item: &WorkItem) -> Result<PathBuf, FetchError> {
        // create_dir_all treats a directory created by a concurrent job as success
        async_fs::create_dir_all(utils::artist_dir(&self.music_dir, &item.artist)).await?;

        let output = Command::new(&self.program)
            .args(self.build_args(item))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| FetchError::SpawnError {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(FetchError::ProcessError {
                code: output.status.code(),
                message: last_line(&output.stderr),
            });
        }

        self.locate_output(item).await
    }
}

/// File extension `yt-dlp` produces for an `--audio-format` value.
pub fn extension_for(format: &str) -> &str {
    match format {
        "aac" | "alac" | "m4a" => "m4a",
        "vorbis" => "ogg",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> WorkItem {
        WorkItem {
            artist: "AC/DC".to_string(),
            track: "Back In Black".to_string(),
            line: "AC/DC - Back In Black".to_string(),
        }
    }

    #[test]
    fn args_search_first_hit_and_transcode() {
        let fetcher = YtDlpFetcher::new(PathBuf::from("musicas")).with_audio("mp3", 192);
        let args = fetcher.build_args(&item());

        assert_eq!(args[0], "ytsearch1:AC/DC Back In Black official audio");
        assert!(args.windows(2).any(|w| w[0] == "--audio-format" && w[1] == "mp3"));
        assert!(args.windows(2).any(|w| w[0] == "--audio-quality" && w[1] == "192K"));
        assert!(args.contains(&"--quiet".to_string()));

        let template = PathBuf::from("musicas")
            .join("AC DC")
            .join("AC DC - Back In Black.%(ext)s");
        assert!(args.contains(&template.to_string_lossy().into_owned()));
    }

    #[test]
    fn extension_follows_codec() {
        assert_eq!(extension_for("mp3"), "mp3");
        assert_eq!(extension_for("vorbis"), "ogg");
        assert_eq!(extension_for("aac"), "m4a");
    }

    async fn touch(path: &Path) {
        async_fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        async_fs::write(path, b"audio").await.unwrap();
    }

    #[tokio::test]
    async fn best_format_accepts_source_extension() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YtDlpFetcher::new(dir.path().to_path_buf()).with_audio("best", 192);
        let artist_dir = dir.path().join("AC DC");
        touch(&artist_dir.join("AC DC - Back In Black.opus.part")).await;
        touch(&artist_dir.join("AC DC - Highway To Hell.opus")).await;

        // only a partial download and another track's file so far
        assert!(matches!(
            fetcher.locate_output(&item()).await,
            Err(FetchError::MissingOutput(_))
        ));

        let produced = artist_dir.join("AC DC - Back In Black.opus");
        touch(&produced).await;
        assert_eq!(fetcher.locate_output(&item()).await.unwrap(), produced);
    }

    #[tokio::test]
    async fn known_codec_requires_its_own_extension() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YtDlpFetcher::new(dir.path().to_path_buf()).with_audio("mp3", 192);
        touch(&dir.path().join("AC DC").join("AC DC - Back In Black.webm")).await;

        assert!(matches!(
            fetcher.locate_output(&item()).await,
            Err(FetchError::MissingOutput(_))
        ));

        let produced = dir.path().join("AC DC").join("AC DC - Back In Black.mp3");
        touch(&produced).await;
        assert_eq!(fetcher.locate_output(&item()).await.unwrap(), produced);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn best_format_download_is_a_success() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let music = dir.path().join("music");
        let script = dir.path().join("fake-yt-dlp");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\nprintf audio > '{}'\n",
                music.join("AC DC").join("AC DC - Back In Black.opus").display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let fetcher = YtDlpFetcher::new(music.clone())
            .with_program(script.to_string_lossy().into_owned())
            .with_audio("best", 192);

        let path = fetcher.fetch(&item()).await.unwrap();
        assert_eq!(path, music.join("AC DC").join("AC DC - Back In Black.opus"));
    }

    #[tokio::test]
    async fn missing_program_becomes_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YtDlpFetcher::new(dir.path().to_path_buf())
            .with_program("trackfetch-no-such-downloader");

        let err = fetcher.fetch(&item()).await.unwrap_err();
        assert!(matches!(err, FetchError::SpawnError { .. }));
        // the artist directory is created before the downloader runs
        assert!(dir.path().join("AC DC").is_dir());
    }
}
