//! Application context: settings plus every external collaborator, built
//! once at startup and passed by reference to the passes.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::config::Settings;
use crate::services::{
    CoverLookup, DeezerCoverClient, HttpImageFetcher, ImageFetcher, LrclibClient, LyricsLookup,
};
use crate::tools::{Downloader, FfmpegTranscoder, Transcoder, YtDlpDownloader};

/// Delay taken before each remote lookup.
pub trait Pacer {
    fn pause(&self);
}

/// Sleeps for a fixed delay; a zero delay is a no-op.
pub struct SleepPacer {
    delay: Duration,
}

impl SleepPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Pacer for SleepPacer {
    fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

pub struct AppContext {
    pub settings: Settings,
    pub pacer: Box<dyn Pacer>,
    pub lyrics: Box<dyn LyricsLookup>,
    pub covers: Box<dyn CoverLookup>,
    pub images: Box<dyn ImageFetcher>,
    pub transcoder: Box<dyn Transcoder>,
    pub downloader: Box<dyn Downloader>,
}

impl AppContext {
    /// Wire the real HTTP clients and tools.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let lyrics = LrclibClient::new(settings.lyrics_timeout)
            .context("Failed to build lyrics client")?;
        let covers = DeezerCoverClient::new(settings.cover_timeout)
            .context("Failed to build cover client")?;
        let images = HttpImageFetcher::new(settings.cover_timeout)
            .context("Failed to build image client")?;
        let transcoder = FfmpegTranscoder::new(settings.ffmpeg.clone(), settings.bitrate_kbps);
        let downloader = YtDlpDownloader::new(settings.yt_dlp.clone(), settings.bitrate_kbps);

        Ok(Self {
            pacer: Box::new(SleepPacer::new(settings.pace)),
            settings,
            lyrics: Box::new(lyrics),
            covers: Box::new(covers),
            images: Box::new(images),
            transcoder: Box::new(transcoder),
            downloader: Box::new(downloader),
        })
    }

    /// Fixed delay before each remote lookup.
    pub fn pace(&self) {
        self.pacer.pause();
    }

    pub fn log_only(&self) -> bool {
        self.settings.log_only
    }

    pub fn quarantine_dir(&self, dir: &Path) -> PathBuf {
        dir.join(&self.settings.quarantine_dir)
    }
}
