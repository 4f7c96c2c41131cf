// Error types for the download-and-merge pipeline

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the external video resolution service.
///
/// These are wrapped and surfaced as-is; the pipeline never tries to
/// interpret them.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Input is neither a URL nor a bare video id
    #[error("invalid URL: {0:?}")]
    InvalidUrl(String),

    /// yt-dlp could not be started
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// yt-dlp ran but exited unsuccessfully
    #[error("execution error: {0}")]
    ExecutionError(String),

    /// yt-dlp output was not the expected JSON
    #[error("parse error: {0}")]
    ParseError(String),

    /// Opening a rendition's byte stream failed
    #[error("stream error: {0}")]
    Stream(String),
}

/// Settings that cannot be turned into a working pipeline.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid proxy {proxy:?}: {source}")]
    InvalidProxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Outcome of a failed stream-to-file copy.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("could not open stream for rendition {rendition}: {source}")]
    StreamOpen {
        rendition: String,
        #[source]
        source: ResolveError,
    },

    #[error("could not create {}: {source}", .path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reading stream for rendition {rendition} failed after {written} bytes: {source}")]
    Read {
        rendition: String,
        written: u64,
        #[source]
        source: io::Error,
    },

    #[error("writing {} failed after {written} bytes: {source}", .path.display())]
    Write {
        path: PathBuf,
        written: u64,
        #[source]
        source: io::Error,
    },
}

/// Failure of the external muxer.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {}{}", describe_code(.code), describe_stderr(.stderr_tail))]
    Exit {
        program: String,
        code: Option<i32>,
        stderr_tail: String,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (killed by signal)".to_string(),
    }
}

fn describe_stderr(tail: &str) -> String {
    if tail.is_empty() {
        String::new()
    } else {
        format!(": {}", tail)
    }
}

/// Non-fatal failure to delete an artifact.
#[derive(Debug, Error)]
#[error("could not remove {}: {source}", .path.display())]
pub struct CleanupWarning {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Which list a numeric selection was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Video,
    Audio,
}

impl std::fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

/// Terminal failure of one orchestration run.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("error getting video {url}: {source}")]
    Resolution {
        url: String,
        #[source]
        source: ResolveError,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("no audio formats found for video {video_id}")]
    NoAudioAvailable { video_id: String },

    #[error("invalid {kind} choice {input:?} (expected 0..{available})")]
    InvalidSelection {
        kind: SelectionKind,
        input: String,
        available: usize,
    },

    #[error("error downloading video stream: {0}")]
    VideoTransfer(#[source] TransferError),

    #[error("error downloading audio stream: {0}")]
    AudioTransfer(#[source] TransferError),

    #[error("error merging {} and {} into {}: {source}", .video.display(), .audio.display(), .output.display())]
    Merge {
        video: PathBuf,
        audio: PathBuf,
        output: PathBuf,
        #[source]
        source: MergeError,
    },
}

impl DownloadError {
    /// Process exit code for this failure kind
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 1,
            Self::Resolution { .. } => 2,
            Self::NoAudioAvailable { .. } => 3,
            Self::InvalidSelection { .. } => 4,
            Self::VideoTransfer(_) => 5,
            Self::AudioTransfer(_) => 6,
            Self::Merge { .. } => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let bad_proxy = reqwest::Proxy::all("ftp://proxy.example:21").err().unwrap();
        let errors = vec![
            DownloadError::Config(ConfigError::InvalidProxy {
                proxy: "ftp://proxy.example:21".to_string(),
                source: bad_proxy,
            }),
            DownloadError::Resolution {
                url: "u".to_string(),
                source: ResolveError::InvalidUrl("u".to_string()),
            },
            DownloadError::NoAudioAvailable {
                video_id: "v".to_string(),
            },
            DownloadError::InvalidSelection {
                kind: SelectionKind::Video,
                input: "9".to_string(),
                available: 1,
            },
            DownloadError::VideoTransfer(TransferError::StreamOpen {
                rendition: "137".to_string(),
                source: ResolveError::Stream("403".to_string()),
            }),
            DownloadError::AudioTransfer(TransferError::StreamOpen {
                rendition: "140".to_string(),
                source: ResolveError::Stream("403".to_string()),
            }),
            DownloadError::Merge {
                video: "video.mp4".into(),
                audio: "audio.mp3".into(),
                output: "output.mp4".into(),
                source: MergeError::Exit {
                    program: "ffmpeg".to_string(),
                    code: Some(1),
                    stderr_tail: String::new(),
                },
            },
        ];

        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(!codes.contains(&0));
    }

    #[test]
    fn test_merge_message_names_stage_and_files() {
        let err = DownloadError::Merge {
            video: "video.mp4".into(),
            audio: "audio.mp3".into(),
            output: "output.mp4".into(),
            source: MergeError::Exit {
                program: "ffmpeg".to_string(),
                code: Some(1),
                stderr_tail: "Invalid data found when processing input".to_string(),
            },
        };

        let msg = err.to_string();
        assert!(msg.contains("merging"));
        assert!(msg.contains("video.mp4"));
        assert!(msg.contains("audio.mp3"));
        assert!(msg.contains("status 1"));
        assert!(msg.contains("Invalid data"));
    }

    #[test]
    fn test_invalid_selection_message() {
        let err = DownloadError::InvalidSelection {
            kind: SelectionKind::Audio,
            input: "abc".to_string(),
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid audio choice \"abc\" (expected 0..3)"
        );
    }
}
