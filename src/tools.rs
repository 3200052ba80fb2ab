//! External tool wrappers: ffmpeg for transcoding, yt-dlp for downloads.
//!
//! Both run synchronously with no timeout; a hung tool blocks the pass.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

use crate::error::ToolError;
use crate::models::DownloadedTrack;
use crate::sanitize::looks_like_url;

/// Transcode one file into the canonical MP3 format.
pub trait Transcoder {
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), ToolError>;
}

/// Resolve a search query or URL to one track, downloaded into `dest_dir`.
pub trait Downloader {
    fn download_best(&self, query: &str, dest_dir: &Path) -> Result<DownloadedTrack, ToolError>;
}

// ============================================================================
// ffmpeg
// ============================================================================

pub struct FfmpegTranscoder {
    program: PathBuf,
    bitrate_kbps: u32,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>, bitrate_kbps: u32) -> Self {
        Self {
            program: program.into(),
            bitrate_kbps,
        }
    }

    fn args(&self, input: &Path, output: &Path) -> Vec<std::ffi::OsString> {
        let mut args: Vec<std::ffi::OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-n".into(), // never overwrite
            "-i".into(),
        ];
        args.push(input.as_os_str().to_owned());
        for arg in ["-vn", "-codec:a", "libmp3lame", "-b:a"] {
            args.push(arg.into());
        }
        args.push(format!("{}k", self.bitrate_kbps).into());
        args.push(output.as_os_str().to_owned());
        args
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        let tool = tool_name(&self.program);
        debug!(input = %input.display(), output = %output.display(), "ffmpeg");
        let result = Command::new(&self.program)
            .args(self.args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ToolError::from_spawn(&tool, e))?;

        if !result.status.success() {
            return Err(ToolError::Failed {
                tool,
                code: result.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// yt-dlp
// ============================================================================

/// Subset of the yt-dlp info dict printed after the file is moved into place.
#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    filepath: Option<String>,
    #[serde(rename = "_filename")]
    filename: Option<String>,
    title: Option<String>,
    uploader: Option<String>,
    channel: Option<String>,
}

pub struct YtDlpDownloader {
    program: PathBuf,
    bitrate_kbps: u32,
}

impl YtDlpDownloader {
    pub fn new(program: impl Into<PathBuf>, bitrate_kbps: u32) -> Self {
        Self {
            program: program.into(),
            bitrate_kbps,
        }
    }

    fn args(&self, query: &str, dest_dir: &Path) -> Vec<std::ffi::OsString> {
        let target = search_target(query);
        let template = dest_dir.join("%(title)s.%(ext)s");
        let mut args: Vec<std::ffi::OsString> = Vec::new();
        for arg in [
            "--format",
            "bestaudio/best",
            "--no-playlist",
            "--extract-audio",
            "--audio-format",
            "mp3",
            "--audio-quality",
        ] {
            args.push(arg.into());
        }
        args.push(format!("{}K", self.bitrate_kbps).into());
        for arg in [
            "--embed-thumbnail",
            "--embed-metadata",
            "--no-simulate",
            "--print",
            "after_move:%()j",
            "--output",
        ] {
            args.push(arg.into());
        }
        args.push(template.into_os_string());
        args.push(target.into());
        args
    }
}

/// Direct URLs pass through; free text becomes a single-result search.
pub fn search_target(query: &str) -> String {
    let trimmed = query.trim();
    if looks_like_url(trimmed) {
        trimmed.to_string()
    } else {
        format!("ytsearch1:{}", trimmed)
    }
}

/// Pull path/title/uploader out of yt-dlp's printed info dict. The JSON is
/// the last non-empty stdout line.
fn parse_download_output(stdout: &str) -> Result<DownloadedTrack, ToolError> {
    let invalid = |reason: String| ToolError::InvalidOutput {
        tool: "yt-dlp".to_string(),
        reason,
    };
    let line = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| l.starts_with('{'))
        .ok_or_else(|| invalid("no info JSON printed".to_string()))?;
    let info: YtDlpInfo =
        serde_json::from_str(line).map_err(|e| invalid(format!("JSON parse error: {}", e)))?;

    let path = info
        .filepath
        .or(info.filename)
        .ok_or_else(|| invalid("info JSON has no filepath".to_string()))?;
    let path = PathBuf::from(path);
    let title = info
        .title
        .filter(|t| !t.trim().is_empty())
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_default();

    Ok(DownloadedTrack {
        path,
        title,
        uploader: info.uploader.or(info.channel).filter(|u| !u.trim().is_empty()),
    })
}

impl Downloader for YtDlpDownloader {
    fn download_best(&self, query: &str, dest_dir: &Path) -> Result<DownloadedTrack, ToolError> {
        let tool = tool_name(&self.program);
        debug!(query, dest = %dest_dir.display(), "yt-dlp");
        // stderr stays attached so the operator sees yt-dlp's own progress
        let result = Command::new(&self.program)
            .args(self.args(query, dest_dir))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| ToolError::from_spawn(&tool, e))?;

        if !result.status.success() {
            return Err(ToolError::Failed {
                tool,
                code: result.status.code().unwrap_or(-1),
                stderr: String::new(),
            });
        }
        parse_download_output(&String::from_utf8_lossy(&result.stdout))
    }
}

// ============================================================================
// Availability
// ============================================================================

/// Whether `program --version` runs successfully.
pub fn is_available(program: &Path) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn tool_name(program: &Path) -> String {
    program
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_target() {
        assert_eq!(search_target("Pink Floyd - Time"), "ytsearch1:Pink Floyd - Time");
        assert_eq!(search_target("  https://youtu.be/abc  "), "https://youtu.be/abc");
    }

    #[test]
    fn test_ffmpeg_args_drop_video_and_fix_bitrate() {
        let ffmpeg = FfmpegTranscoder::new("ffmpeg", 320);
        let args: Vec<String> = ffmpeg
            .args(Path::new("/m/in.flac"), Path::new("/m/in.mp3"))
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(args.contains(&"-vn".to_string()));
        assert!(args.contains(&"-n".to_string()));
        assert!(args.windows(2).any(|w| w[0] == "-b:a" && w[1] == "320k"));
        assert!(args.windows(2).any(|w| w[0] == "-i" && w[1] == "/m/in.flac"));
        assert_eq!(args.last().map(String::as_str), Some("/m/in.mp3"));
    }

    #[test]
    fn test_yt_dlp_args() {
        let ytdlp = YtDlpDownloader::new("yt-dlp", 192);
        let args: Vec<String> = ytdlp
            .args("Daft Punk - One More Time", Path::new("/music"))
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(args.windows(2).any(|w| w[0] == "--audio-quality" && w[1] == "192K"));
        assert!(args.windows(2).any(|w| w[0] == "--audio-format" && w[1] == "mp3"));
        assert!(args.contains(&"--embed-thumbnail".to_string()));
        assert!(args.contains(&"--embed-metadata".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("ytsearch1:Daft Punk - One More Time"));
    }

    #[test]
    fn test_parse_download_output() {
        let stdout = "[download] 100%\n{\"filepath\": \"/music/Song (Official Video).mp3\", \"title\": \"Song (Official Video)\", \"uploader\": \"Band VEVO\"}\n";
        let track = parse_download_output(stdout).unwrap();
        assert_eq!(track.path, PathBuf::from("/music/Song (Official Video).mp3"));
        assert_eq!(track.title, "Song (Official Video)");
        assert_eq!(track.uploader.as_deref(), Some("Band VEVO"));
    }

    #[test]
    fn test_parse_download_output_falls_back_to_channel_and_stem() {
        let stdout = r#"{"_filename": "/music/Track.mp3", "title": "", "channel": "Some Channel"}"#;
        let track = parse_download_output(stdout).unwrap();
        assert_eq!(track.title, "Track");
        assert_eq!(track.uploader.as_deref(), Some("Some Channel"));
    }

    #[test]
    fn test_parse_download_output_without_json() {
        let err = parse_download_output("ERROR: nothing\n").unwrap_err();
        assert!(err.to_string().contains("no info JSON"));
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        assert!(!is_available(Path::new("definitely-not-a-real-tool-xyz")));
    }
}
