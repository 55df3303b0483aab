//! Stream selection and file naming.

use crate::extractor::{MediaStream, SearchResult};

/// Longest file stem produced by [`sanitize_file_stem`], in characters.
pub const MAX_STEM_CHARS: usize = 100;

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Picks the audio-only stream with the highest average bitrate.
///
/// Streams without a reported bitrate rank below any that have one. The first
/// listed stream wins ties. Returns `None` when no stream is audio-only.
pub fn select_audio_stream(result: &SearchResult) -> Option<&MediaStream> {
    let rank = |s: &MediaStream| s.abr.unwrap_or(f64::NEG_INFINITY);

    result
        .streams
        .iter()
        .filter(|s| s.is_audio_only())
        .fold(None, |best: Option<&MediaStream>, s| match best {
            Some(b) if rank(s) <= rank(b) => Some(b),
            _ => Some(s),
        })
}

/// Turns a track title into a safe, portable file stem.
pub fn sanitize_file_stem(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if c.is_control() || FORBIDDEN.contains(&c) { ' ' } else { c })
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let trim = |s: &str| s.trim_matches(|c| c == '.' || c == ' ').to_string();

    let capped: String = trim(&collapsed).chars().take(MAX_STEM_CHARS).collect();
    let stem = trim(&capped);

    if stem.is_empty() {
        "audio".to_string()
    } else {
        stem
    }
}
