// MergeInvoker - ffmpeg wrapper that muxes one video and one audio file

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::errors::MergeError;
use super::traits::Muxer;
use super::utils::{run_output_with_timeout, tail_lines};

/// Audio is always re-encoded to this codec; video is stream-copied
pub const TARGET_AUDIO_CODEC: &str = "aac";

const STDERR_TAIL_LINES: usize = 3;

pub struct FfmpegMuxer {
    binary_path: PathBuf,
}

impl FfmpegMuxer {
    pub fn new(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// `-i <video> -i <audio> -c:v copy -c:a aac <output>`
    pub fn build_args(video: &Path, audio: &Path, output: &Path) -> Vec<String> {
        vec![
            "-i".to_string(),
            video.to_string_lossy().into_owned(),
            "-i".to_string(),
            audio.to_string_lossy().into_owned(),
            "-c:v".to_string(),
            "copy".to_string(),
            "-c:a".to_string(),
            TARGET_AUDIO_CODEC.to_string(),
            output.to_string_lossy().into_owned(),
        ]
    }

    fn program(&self) -> String {
        self.binary_path.display().to_string()
    }
}

#[async_trait]
impl Muxer for FfmpegMuxer {
    async fn merge(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MergeError> {
        let args = Self::build_args(video, audio, output);
        tracing::debug!("[ffmpeg] {} {}", self.binary_path.display(), args.join(" "));

        // stdin is closed, so an overwrite prompt fails instead of hanging
        let out = run_output_with_timeout(&self.binary_path, &args, None)
            .await
            .map_err(|source| MergeError::Spawn {
                program: self.program(),
                source,
            })?;

        if out.status.success() {
            return Ok(());
        }

        Err(MergeError::Exit {
            program: self.program(),
            code: out.status.code(),
            stderr_tail: tail_lines(&out.stderr, STDERR_TAIL_LINES),
        })
    }
}
