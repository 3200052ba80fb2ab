//! Test fixtures: tagged MP3 files on disk and fakes for every external
//! collaborator of the passes.

use id3::frame::{Lyrics, Picture, PictureType};
use id3::{Tag, TagLike, Version};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use crate::config::Settings;
use crate::context::{AppContext, Pacer};
use crate::error::{ServiceError, ToolError};
use crate::models::DownloadedTrack;
use crate::services::{CoverLookup, ImageFetcher, LyricsLookup};
use crate::tools::{Downloader, Transcoder};

/// Filler standing in for MPEG frames after the tag.
const AUDIO_FILLER: [u8; 64] = [0xAA; 64];

#[derive(Default, Clone)]
pub struct Fixture {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub lyrics: Option<String>,
    pub cover: bool,
}

impl Fixture {
    pub fn tagged(artist: &str, title: &str) -> Self {
        Self {
            artist: Some(artist.to_string()),
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn untagged() -> Self {
        Self::default()
    }

    pub fn with_lyrics(mut self, text: &str) -> Self {
        self.lyrics = Some(text.to_string());
        self
    }

    pub fn with_cover(mut self) -> Self {
        self.cover = true;
        self
    }
}

/// Write `name` under `dir` with the fixture's tags and return its path.
pub fn write_mp3(dir: &Path, name: &str, fixture: &Fixture) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, AUDIO_FILLER).unwrap();

    let mut tag = Tag::new();
    if let Some(artist) = &fixture.artist {
        tag.set_artist(artist.as_str());
    }
    if let Some(title) = &fixture.title {
        tag.set_title(title.as_str());
    }
    if let Some(text) = &fixture.lyrics {
        tag.add_frame(Lyrics {
            lang: "und".to_string(),
            description: String::new(),
            text: text.clone(),
        });
    }
    if fixture.cover {
        tag.add_frame(Picture {
            mime_type: "image/jpeg".to_string(),
            picture_type: PictureType::CoverFront,
            description: String::new(),
            data: vec![0xFF, 0xD8, 0xFF],
        });
    }
    if tag.frames().next().is_some() {
        tag.write_to_path(&path, Version::Id3v24).unwrap();
    }
    path
}

/// Sorted file names directly under `dir` (directories excluded).
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ============================================================================
// Fakes
// ============================================================================

/// Shared call log so tests can inspect calls after the fake is boxed.
pub type Calls = Rc<RefCell<Vec<String>>>;

pub struct FakeLyrics {
    pub answer: Option<String>,
    pub calls: Calls,
}

impl LyricsLookup for FakeLyrics {
    fn find_synced_lyrics(&self, artist: &str, title: &str) -> Option<String> {
        self.calls.borrow_mut().push(format!("{} - {}", artist, title));
        self.answer.clone()
    }
}

pub struct FakeCovers {
    pub answer: Option<String>,
    pub calls: Calls,
}

impl CoverLookup for FakeCovers {
    fn find_cover_url(&self, artist: &str, title: &str) -> Option<String> {
        self.calls.borrow_mut().push(format!("{} - {}", artist, title));
        self.answer.clone()
    }
}

pub struct FakeImages {
    pub bytes: Option<Vec<u8>>,
}

impl ImageFetcher for FakeImages {
    fn fetch_bytes(&self, _url: &str) -> Result<Vec<u8>, ServiceError> {
        self.bytes.clone().ok_or(ServiceError::Status(404))
    }
}

/// Counts pauses instead of sleeping.
pub struct CountingPacer {
    pub pauses: Rc<Cell<usize>>,
}

impl Pacer for CountingPacer {
    fn pause(&self) {
        self.pauses.set(self.pauses.get() + 1);
    }
}

/// Copies the input to the output on success, optionally leaving a partial
/// output behind on failure.
pub struct FakeTranscoder {
    pub fail: bool,
    pub leave_partial: bool,
    pub calls: Rc<Cell<usize>>,
}

impl Transcoder for FakeTranscoder {
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            if self.leave_partial {
                std::fs::write(output, b"partial")?;
            }
            return Err(ToolError::Failed {
                tool: "ffmpeg".to_string(),
                code: 1,
                stderr: "Invalid data found when processing input".to_string(),
            });
        }
        std::fs::copy(input, output)?;
        Ok(())
    }
}

/// Writes an untagged MP3 named after `title` into the destination.
pub struct FakeDownloader {
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub queries: Calls,
}

impl Downloader for FakeDownloader {
    fn download_best(&self, query: &str, dest_dir: &Path) -> Result<DownloadedTrack, ToolError> {
        self.queries.borrow_mut().push(query.to_string());
        let title = self.title.clone().ok_or_else(|| ToolError::Failed {
            tool: "yt-dlp".to_string(),
            code: 1,
            stderr: "no results".to_string(),
        })?;
        let path = dest_dir.join(format!("{}.mp3", title.replace('/', "_")));
        std::fs::write(&path, AUDIO_FILLER)?;
        Ok(DownloadedTrack {
            path,
            title,
            uploader: self.uploader.clone(),
        })
    }
}

// ============================================================================
// Context builder
// ============================================================================

/// Builder for an `AppContext` wired to fakes, with counted pacing and hidden
/// progress bars.
pub struct TestContext {
    pub lyrics: Option<String>,
    pub cover_url: Option<String>,
    pub image: Option<Vec<u8>>,
    pub transcode_fails: bool,
    pub transcode_leaves_partial: bool,
    pub download_title: Option<String>,
    pub download_uploader: Option<String>,
    pub lyrics_calls: Calls,
    pub cover_calls: Calls,
    pub transcode_calls: Rc<Cell<usize>>,
    pub download_queries: Calls,
    pub pauses: Rc<Cell<usize>>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self {
            lyrics: None,
            cover_url: None,
            image: Some(vec![0x89, 0x50, 0x4E, 0x47]),
            transcode_fails: false,
            transcode_leaves_partial: false,
            download_title: None,
            download_uploader: None,
            lyrics_calls: Calls::default(),
            cover_calls: Calls::default(),
            transcode_calls: Rc::new(Cell::new(0)),
            download_queries: Calls::default(),
            pauses: Rc::new(Cell::new(0)),
        }
    }
}

impl TestContext {
    pub fn build(&self) -> AppContext {
        let settings = Settings {
            log_only: true,
            pace: Duration::ZERO,
            ..Settings::default()
        };
        AppContext {
            settings,
            pacer: Box::new(CountingPacer {
                pauses: Rc::clone(&self.pauses),
            }),
            lyrics: Box::new(FakeLyrics {
                answer: self.lyrics.clone(),
                calls: Rc::clone(&self.lyrics_calls),
            }),
            covers: Box::new(FakeCovers {
                answer: self.cover_url.clone(),
                calls: Rc::clone(&self.cover_calls),
            }),
            images: Box::new(FakeImages {
                bytes: self.image.clone(),
            }),
            transcoder: Box::new(FakeTranscoder {
                fail: self.transcode_fails,
                leave_partial: self.transcode_leaves_partial,
                calls: Rc::clone(&self.transcode_calls),
            }),
            downloader: Box::new(FakeDownloader {
                title: self.download_title.clone(),
                uploader: self.download_uploader.clone(),
                queries: Rc::clone(&self.download_queries),
            }),
        }
    }
}
