use std::path::{Path, PathBuf};

use crate::types::{ParsedLine, WorkItem};

pub const LINE_SEPARATOR: &str = " - ";
const MAX_NAME_LEN: usize = 100;
const INVALID_NAME_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

pub fn parse_line(raw: &str) -> ParsedLine {
    let line = raw.trim();
    match line.split_once(LINE_SEPARATOR) {
        Some((artist, track)) => ParsedLine::Item(WorkItem {
            artist: artist.trim().to_string(),
            track: track.trim().to_string(),
            line: line.to_string(),
        }),
        None => ParsedLine::Malformed(line.to_string()),
    }
}

/// Splits raw lines into well-formed work items and malformed lines.
///
/// Blank lines carry no separator and end up with the malformed ones.
pub fn parse_lines<I, S>(lines: I) -> (Vec<WorkItem>, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut items = Vec::new();
    let mut malformed = Vec::new();

    for raw in lines {
        match parse_line(raw.as_ref()) {
            ParsedLine::Item(item) => items.push(item),
            ParsedLine::Malformed(line) => malformed.push(line),
        }
    }

    (items, malformed)
}

pub fn sanitize_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if INVALID_NAME_CHARS.contains(&c) { ' ' } else { c })
        .collect();

    replaced
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .chars()
        .take(MAX_NAME_LEN)
        .collect()
}

pub fn search_query(item: &WorkItem) -> String {
    format!("{} {} official audio", item.artist, item.track)
}

pub fn artist_dir(root: &Path, artist: &str) -> PathBuf {
    root.join(sanitize_name(artist))
}

/// File name of a download without its extension.
pub fn output_stem(item: &WorkItem) -> String {
    format!(
        "{} - {}",
        sanitize_name(&item.artist),
        sanitize_name(&item.track)
    )
}

/// Output template handed to the downloader; `%(ext)s` is filled in by it.
pub fn output_template(root: &Path, item: &WorkItem) -> PathBuf {
    artist_dir(root, &item.artist).join(format!("{}.%(ext)s", output_stem(item)))
}

/// Final path of the transcoded file for a given codec extension.
pub fn output_file(root: &Path, item: &WorkItem, extension: &str) -> PathBuf {
    artist_dir(root, &item.artist).join(format!("{}.{}", output_stem(item), extension))
}
