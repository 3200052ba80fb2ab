//! Command-line options and the resolved settings carried in the app context.
//!
//! Every option has a default, so a bare invocation starts the interactive
//! shell with stock behavior.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_QUARANTINE_DIR: &str = "sin letras";
pub const CANONICAL_EXTENSION: &str = "mp3";

#[derive(Parser, Debug)]
#[command(name = "sonic-forge")]
#[command(about = "Rename, tag, convert and download MP3 files in bulk")]
pub struct Args {
    /// Music directory; when set, passes use it instead of prompting
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Hide progress bars and print periodic log lines instead
    #[arg(long)]
    pub log_only: bool,

    /// Delay before each lyrics/cover lookup, in milliseconds
    #[arg(long, default_value = "500")]
    pub pace_ms: u64,

    /// MP3 bitrate for conversions and downloads, in kbps
    #[arg(long, default_value = "320")]
    pub bitrate: u32,

    /// Lyrics lookup timeout, in seconds
    #[arg(long, default_value = "10")]
    pub lyrics_timeout: u64,

    /// Cover lookup and image download timeout, in seconds
    #[arg(long, default_value = "5")]
    pub cover_timeout: u64,

    #[arg(long, default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    #[arg(long, default_value = "yt-dlp")]
    pub yt_dlp: PathBuf,

    /// Name of the subdirectory that receives files without lyrics
    #[arg(long, default_value = DEFAULT_QUARANTINE_DIR)]
    pub quarantine: String,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Typed configuration, built once from `Args`.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dir: Option<PathBuf>,
    pub log_only: bool,
    pub pace: Duration,
    pub bitrate_kbps: u32,
    pub lyrics_timeout: Duration,
    pub cover_timeout: Duration,
    pub ffmpeg: PathBuf,
    pub yt_dlp: PathBuf,
    pub quarantine_dir: String,
}

impl From<&Args> for Settings {
    fn from(args: &Args) -> Self {
        Self {
            dir: args.dir.clone(),
            log_only: args.log_only,
            pace: Duration::from_millis(args.pace_ms),
            bitrate_kbps: args.bitrate,
            lyrics_timeout: Duration::from_secs(args.lyrics_timeout),
            cover_timeout: Duration::from_secs(args.cover_timeout),
            ffmpeg: args.ffmpeg.clone(),
            yt_dlp: args.yt_dlp.clone(),
            quarantine_dir: args.quarantine.clone(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::from(&Args::parse_from(["sonic-forge"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.dir, None);
        assert!(!settings.log_only);
        assert_eq!(settings.pace, Duration::from_millis(500));
        assert_eq!(settings.bitrate_kbps, 320);
        assert_eq!(settings.lyrics_timeout, Duration::from_secs(10));
        assert_eq!(settings.cover_timeout, Duration::from_secs(5));
        assert_eq!(settings.ffmpeg, PathBuf::from("ffmpeg"));
        assert_eq!(settings.yt_dlp, PathBuf::from("yt-dlp"));
        assert_eq!(settings.quarantine_dir, "sin letras");
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "sonic-forge",
            "--dir",
            "/music",
            "--log-only",
            "--pace-ms",
            "0",
            "--bitrate",
            "192",
            "--quarantine",
            "no-lyrics",
        ]);
        let settings = Settings::from(&args);
        assert_eq!(settings.dir, Some(PathBuf::from("/music")));
        assert!(settings.log_only);
        assert_eq!(settings.pace, Duration::ZERO);
        assert_eq!(settings.bitrate_kbps, 192);
        assert_eq!(settings.quarantine_dir, "no-lyrics");
    }
}
