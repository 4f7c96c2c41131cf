// Seams to the external collaborators: resolution service and muxer

use std::path::Path;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::errors::{MergeError, ResolveError};
use super::models::{RenditionDescriptor, VideoInfo};

/// Readable bytes of one rendition
pub type MediaStream = Box<dyn AsyncRead + Send + Unpin>;

/// Resolves a video and opens its rendition streams
#[async_trait]
pub trait VideoResolver: Send + Sync {
    /// Name of the resolver (for logging)
    fn name(&self) -> &'static str;

    /// Look up a video and list its renditions
    async fn resolve(&self, url: &str) -> Result<VideoInfo, ResolveError>;

    /// Open the byte stream of one rendition
    async fn open_stream(&self, rendition: &RenditionDescriptor)
        -> Result<MediaStream, ResolveError>;
}

/// Combines one video file and one audio file into one output file
#[async_trait]
pub trait Muxer: Send + Sync {
    /// Blocks until the external tool exits. A failed merge may leave a
    /// partial `output` behind.
    async fn merge(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MergeError>;
}
