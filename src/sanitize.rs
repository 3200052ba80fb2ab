//! Filename sanitization and title cleanup.
//!
//! Used by the rename pass (tag values → filename components) and by the
//! download pass (video titles → "Artist - Title").
//!
//! Every function here is pure, total and idempotent. Tests below pin that.

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Characters that are invalid in a filename on at least one supported OS.
pub const INVALID_FILENAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Separator between artist and title in filenames and video titles.
pub const ARTIST_TITLE_SEPARATOR: &str = " - ";

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Marketing/junk phrases stripped from downloaded titles (applied in order).
pub static JUNK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // "(Official Video)", "[Official Music Video]", "(Official Lyric Video)", "(Official Audio)"
        Regex::new(r"(?i)\s*[\(\[]\s*official\s+(?:music\s+|lyrics?\s+)?(?:video|audio|visuali[sz]er)(?:\s+\d{4})?\s*[\)\]]").unwrap(),
        // "(Music Video)", "(Lyric Video)", "[Lyrics Video]", "(Audio)", "(Video)", "(Visualizer)"
        Regex::new(r"(?i)\s*[\(\[]\s*(?:music\s+|lyrics?\s+)?(?:video|audio|visuali[sz]er)\s*[\)\]]").unwrap(),
        // Spanish variants: "(Video Oficial)", "[Audio Oficial]", "(Letra)", "(Con Letra)"
        Regex::new(r"(?i)\s*[\(\[]\s*(?:video|audio|videoclip)\s+oficial\s*[\)\]]").unwrap(),
        Regex::new(r"(?i)\s*[\(\[]\s*(?:con\s+)?letras?\s*[\)\]]").unwrap(),
        // "[Lyrics]", "(Lyric)", "[HD]", "(HQ)", "[4K]", "(Explicit)"
        Regex::new(r"(?i)\s*[\(\[]\s*(?:lyrics?|hd|hq|4k|explicit)\s*[\)\]]").unwrap(),
        // Bare phrases: "Official Video", "Official Music Video", "Official Audio"
        Regex::new(r"(?i)\bofficial\s+(?:music\s+|lyrics?\s+)?(?:video|audio)\b").unwrap(),
        // Bare "Video Oficial" / "Audio Oficial"
        Regex::new(r"(?i)\b(?:video|audio)\s+oficial\b").unwrap(),
    ]
});

/// Separators left dangling at the end once a junk phrase is removed: "Song - "
pub static TRAILING_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\s*[-–—|])+\s*$").unwrap());

/// Empty brackets left behind: "Song ()" / "Song []"
pub static EMPTY_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*(?:\(\s*\)|\[\s*\])").unwrap());

/// Runs of whitespace, collapsed to a single space.
pub static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// ============================================================================
// SANITIZATION
// ============================================================================

/// Delete every filesystem-invalid character. No substitution is made.
/// e.g., "AC/DC: Live?" → "ACDC Live"
pub fn sanitize_filename(text: &str) -> String {
    text.chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(c))
        .collect()
}

/// Remove marketing phrases, collapse whitespace and trim.
/// e.g., "Artist - Song (Official Video)" → "Artist - Song"
pub fn strip_junk(text: &str) -> String {
    let mut current = collapse_whitespace(text);
    // Removing one phrase can expose another; every round shrinks or stops
    while let Some(next) = strip_junk_once(&current) {
        current = next;
    }
    current
}

/// One removal round. None when no junk phrase matched, so separators and
/// brackets that were already in the title are left alone.
fn strip_junk_once(text: &str) -> Option<String> {
    let mut result = text.to_string();
    let mut matched = false;
    for pattern in JUNK_PATTERNS.iter() {
        if pattern.is_match(&result) {
            matched = true;
            result = pattern.replace_all(&result, "").to_string();
        }
    }
    if !matched {
        return None;
    }
    result = EMPTY_BRACKETS.replace_all(&result, "").to_string();
    result = TRAILING_SEPARATOR.replace(&result, "").to_string();
    Some(collapse_whitespace(&result))
}

fn collapse_whitespace(text: &str) -> String {
    MULTI_SPACE.replace_all(text, " ").trim().to_string()
}

/// Clean a display title for use as a filename stem: junk stripped, invalid
/// characters removed.
pub fn clean_title(text: &str) -> String {
    collapse_whitespace(&sanitize_filename(&strip_junk(text)))
}

// ============================================================================
// SPLITTING
// ============================================================================

/// Split "Artist - Title" on the first separator.
/// Returns None when there is no separator or either side would be empty.
/// e.g., "Pink Floyd - Time - Live" → Some(("Pink Floyd", "Time - Live"))
pub fn split_artist_title(text: &str) -> Option<(String, String)> {
    let (artist, title) = text.split_once(ARTIST_TITLE_SEPARATOR)?;
    let artist = artist.trim();
    let title = title.trim();
    if artist.is_empty() || title.is_empty() {
        return None;
    }
    Some((artist.to_string(), title.to_string()))
}

/// Whether a download query is a direct URL rather than free search text.
pub fn looks_like_url(input: &str) -> bool {
    let lowered = input.trim().to_ascii_lowercase();
    lowered.starts_with("http://")
        || lowered.starts_with("https://")
        || lowered.starts_with("www.")
        || lowered.contains("://")
}

// ============================================================================
// TESTS
// ============================================================================
