//! Typed access to the ID3 tag of a single MP3 file.
//!
//! All frame-level details (TPE1/TIT2/USLT/APIC) stay behind [`TrackTags`];
//! passes only see named getters and setters.

use id3::frame::{Lyrics, Picture, PictureType};
use id3::{ErrorKind, Tag, TagLike, Version};
use std::path::{Path, PathBuf};

use crate::error::TagError;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Language and description used for the single lyrics frame we write.
const LYRICS_LANG: &str = "und";
const LYRICS_DESCRIPTION: &str = "Lyrics";

/// Tag container of one audio file, loaded into memory.
#[derive(Debug)]
pub struct TrackTags {
    path: PathBuf,
    tag: Tag,
}

impl TrackTags {
    /// Load the tag of `path`. A file without any tag yields an empty
    /// container; a tag that cannot be parsed is an error.
    pub fn load(path: &Path) -> Result<Self, TagError> {
        let tag = match Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(err) if matches!(err.kind, ErrorKind::NoTag) => Tag::new(),
            Err(source) => {
                return Err(TagError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            tag,
        })
    }

    /// Artist, or None when absent or blank.
    pub fn artist(&self) -> Option<&str> {
        non_blank(self.tag.artist())
    }

    /// Title, or None when absent or blank.
    pub fn title(&self) -> Option<&str> {
        non_blank(self.tag.title())
    }

    pub fn artist_or_default(&self) -> &str {
        self.artist().unwrap_or(UNKNOWN_ARTIST)
    }

    pub fn title_or_default(&self) -> &str {
        self.title().unwrap_or(UNKNOWN_TITLE)
    }

    /// Both artist and title, when both are present.
    pub fn artist_and_title(&self) -> Option<(&str, &str)> {
        Some((self.artist()?, self.title()?))
    }

    pub fn set_artist(&mut self, artist: &str) {
        self.tag.set_artist(artist);
    }

    pub fn set_title(&mut self, title: &str) {
        self.tag.set_title(title);
    }

    /// First non-empty lyrics payload.
    pub fn synced_lyrics(&self) -> Option<&str> {
        self.tag
            .lyrics()
            .map(|l| l.text.as_str())
            .find(|text| !text.trim().is_empty())
    }

    pub fn has_synced_lyrics(&self) -> bool {
        self.synced_lyrics().is_some()
    }

    /// Replace any lyrics frames with exactly one.
    pub fn set_synced_lyrics(&mut self, text: &str) {
        self.tag.remove("USLT");
        self.tag.add_frame(Lyrics {
            lang: LYRICS_LANG.to_string(),
            description: LYRICS_DESCRIPTION.to_string(),
            text: text.to_string(),
        });
    }

    /// Whether any picture is embedded.
    pub fn has_cover(&self) -> bool {
        self.tag.pictures().next().is_some()
    }

    /// Replace the front cover with `data`.
    pub fn set_front_cover(&mut self, data: Vec<u8>, mime_type: &str) {
        self.tag.remove_picture_by_type(PictureType::CoverFront);
        self.tag.add_frame(Picture {
            mime_type: mime_type.to_string(),
            picture_type: PictureType::CoverFront,
            description: "Cover".to_string(),
            data,
        });
    }

    /// Persist the tag back to the file (ID3v2.4).
    pub fn save(&self) -> Result<(), TagError> {
        self.tag
            .write_to_path(&self.path, Version::Id3v24)
            .map_err(|source| TagError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
