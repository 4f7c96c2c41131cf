// Downloader module - resolve, pick, fetch and merge one video

pub mod catalog;
pub mod cleaner;
pub mod config;
pub mod console;
pub mod errors;
pub mod fetcher;
pub mod models;
pub mod muxer;
pub mod orchestrator;
pub mod resolver;
pub mod tools;
pub mod traits;
pub mod utils;

pub use catalog::RenditionCatalog;
pub use config::DownloaderConfig;
pub use console::{Console, MenuChoice};
pub use errors::{
    CleanupWarning, ConfigError, DownloadError, MergeError, ResolveError, TransferError,
};
pub use models::{
    ArtifactPaths, DownloadJob, JobOutcome, MediaKind, RenditionDescriptor, RenditionSet, VideoInfo,
};
pub use muxer::FfmpegMuxer;
pub use orchestrator::{DownloadOrchestrator, Stage};
pub use resolver::YtDlpResolver;
pub use tools::{ToolManager, ToolType};
pub use traits::{MediaStream, Muxer, VideoResolver};
