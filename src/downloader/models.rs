// Common data models for the download pipeline

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Fixed artifact file names, relative to the artifact directory
pub const VIDEO_FILENAME: &str = "video.mp4";
pub const AUDIO_FILENAME: &str = "audio.mp3";
pub const OUTPUT_FILENAME: &str = "output.mp4";

/// Media kind tag as reported by the resolution service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
    /// Muxed audio + video
    Combined,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
            Self::Combined => write!(f, "combined"),
        }
    }
}

/// One downloadable stream of a video.
#[derive(Debug, Clone, PartialEq)]
pub struct RenditionDescriptor {
    /// Opaque id (yt-dlp format id, e.g. "137", "140")
    pub id: String,
    pub kind: MediaKind,
    /// Human-readable quality (e.g. "720p", "128kbps")
    pub quality: String,
    /// e.g. `video/mp4; codecs="avc1.4d401f"`
    pub mime_type: String,
    pub audio_channels: u32,
    /// Direct media URL, when the resolver provides one
    pub url: Option<String>,
    /// Request headers required by the media host
    pub http_headers: BTreeMap<String, String>,
}

impl RenditionDescriptor {
    pub fn new(
        id: impl Into<String>,
        kind: MediaKind,
        quality: impl Into<String>,
        mime_type: impl Into<String>,
        audio_channels: u32,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            quality: quality.into(),
            mime_type: mime_type.into(),
            audio_channels,
            url: None,
            http_headers: BTreeMap::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.http_headers = headers;
        self
    }

    /// MIME type mentions video content
    pub fn is_video(&self) -> bool {
        self.mime_type.to_ascii_lowercase().contains("video")
    }

    /// MIME type mentions audio content
    pub fn is_audio(&self) -> bool {
        self.mime_type.to_ascii_lowercase().contains("audio")
    }
}

/// A resolved video: metadata plus every rendition the service offers
#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    pub uploader: String,
    pub duration_seconds: u64,
    pub renditions: Vec<RenditionDescriptor>,
}

impl VideoInfo {
    /// Duration as `h:mm:ss` or `m:ss`
    pub fn duration_label(&self) -> String {
        let h = self.duration_seconds / 3600;
        let m = (self.duration_seconds % 3600) / 60;
        let s = self.duration_seconds % 60;
        if h > 0 {
            format!("{}:{:02}:{:02}", h, m, s)
        } else {
            format!("{}:{:02}", m, s)
        }
    }
}

/// Renditions grouped for selection. Built once per resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenditionSet {
    pub video: Vec<RenditionDescriptor>,
    pub audio: Vec<RenditionDescriptor>,
    /// Video renditions that also carry audio; an audio source of last resort
    pub combined: Vec<RenditionDescriptor>,
}

/// The three well-known files of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub video: PathBuf,
    pub audio: PathBuf,
    pub output: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            video: dir.join(VIDEO_FILENAME),
            audio: dir.join(AUDIO_FILENAME),
            output: dir.join(OUTPUT_FILENAME),
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [self.video.as_path(), self.audio.as_path(), self.output.as_path()]
    }

    pub fn intermediates(&self) -> [&Path; 2] {
        [self.video.as_path(), self.audio.as_path()]
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

/// One orchestration run after both selections are made
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub video: RenditionDescriptor,
    pub audio: RenditionDescriptor,
    pub paths: ArtifactPaths,
}

/// What a successful run leaves behind
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub title: String,
    pub output: PathBuf,
    pub video_bytes: u64,
    pub audio_bytes: u64,
}
