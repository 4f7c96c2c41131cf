pub mod downloader;
pub mod logging;

use downloader::{
    ConfigError, DownloadOrchestrator, DownloaderConfig, FfmpegMuxer, ToolManager, YtDlpResolver,
};

/// Wire the yt-dlp resolver and ffmpeg muxer from `config`
pub fn build_orchestrator(config: &DownloaderConfig) -> Result<DownloadOrchestrator, ConfigError> {
    let tools = ToolManager::new();
    let ytdlp = config.ytdlp_binary(&tools);
    let ffmpeg = config.ffmpeg_binary(&tools);
    tracing::debug!("Using yt-dlp at {}, ffmpeg at {}", ytdlp.display(), ffmpeg.display());

    let resolver = YtDlpResolver::new(ytdlp, config.proxy.clone(), config.resolve_timeout)?;
    let muxer = FfmpegMuxer::new(ffmpeg);

    Ok(DownloadOrchestrator::new(
        Box::new(resolver),
        Box::new(muxer),
        config.artifact_paths(),
    ))
}
