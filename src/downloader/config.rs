// Runtime configuration for the downloader

use std::path::PathBuf;
use std::time::Duration;

use super::models::ArtifactPaths;
use super::tools::{ToolManager, ToolType};

#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Explicit ffmpeg binary; discovered when `None`
    pub ffmpeg_path: Option<PathBuf>,
    /// Explicit yt-dlp binary; discovered when `None`
    pub ytdlp_path: Option<PathBuf>,
    /// HTTP or SOCKS5 proxy URL (e.g. "socks5://127.0.0.1:1080")
    pub proxy: Option<String>,
    /// Upper bound on the yt-dlp lookup. Transfers and the merge are unbounded.
    pub resolve_timeout: Duration,
    /// Where video.mp4, audio.mp3 and output.mp4 live
    pub artifact_dir: PathBuf,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            ytdlp_path: None,
            proxy: None,
            resolve_timeout: Duration::from_secs(30),
            artifact_dir: PathBuf::from("."),
        }
    }
}

impl DownloaderConfig {
    pub fn with_ffmpeg_path(mut self, path: Option<PathBuf>) -> Self {
        self.ffmpeg_path = path;
        self
    }

    pub fn with_ytdlp_path(mut self, path: Option<PathBuf>) -> Self {
        self.ytdlp_path = path;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn with_resolve_timeout(mut self, seconds: u64) -> Self {
        self.resolve_timeout = Duration::from_secs(seconds);
        self
    }

    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::in_dir(&self.artifact_dir)
    }

    pub fn ffmpeg_binary(&self, tools: &ToolManager) -> PathBuf {
        tools.resolve_binary(ToolType::Ffmpeg, self.ffmpeg_path.as_deref())
    }

    pub fn ytdlp_binary(&self, tools: &ToolManager) -> PathBuf {
        tools.resolve_binary(ToolType::YtDlp, self.ytdlp_path.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DownloaderConfig::default();
        assert_eq!(config.resolve_timeout, Duration::from_secs(30));
        assert_eq!(config.artifact_paths(), ArtifactPaths::in_dir("."));
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_builders() {
        let config = DownloaderConfig::default()
            .with_proxy(Some("socks5://127.0.0.1:1080".to_string()))
            .with_resolve_timeout(5)
            .with_ffmpeg_path(Some(PathBuf::from("/opt/ffmpeg")))
            .with_artifact_dir("/tmp/job");

        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert_eq!(config.resolve_timeout, Duration::from_secs(5));
        assert_eq!(
            config.ffmpeg_binary(&ToolManager::with_search_dirs(Vec::new())),
            PathBuf::from("/opt/ffmpeg")
        );
        assert_eq!(config.artifact_paths().output, PathBuf::from("/tmp/job/output.mp4"));
    }

    #[test]
    fn test_blank_proxy_is_ignored() {
        let config = DownloaderConfig::default().with_proxy(Some("  ".to_string()));
        assert!(config.proxy.is_none());
    }
}
