// DownloadOrchestrator - the whole resolve -> pick -> fetch -> merge run
//
// Stages run strictly one after another. Every failure ends the run; only
// the pre-fetch clean is guaranteed to have happened by then.

use std::fmt;
use std::io::{self, BufRead, Write};

use super::catalog::RenditionCatalog;
use super::cleaner::{self, Remover};
use super::console::Console;
use super::errors::{DownloadError, SelectionKind};
use super::fetcher;
use super::models::{ArtifactPaths, DownloadJob, JobOutcome};
use super::traits::{Muxer, VideoResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Resolving,
    Classifying,
    AwaitingVideoChoice,
    AwaitingAudioChoice,
    PreClean,
    FetchingVideo,
    FetchingAudio,
    Merging,
    PostClean,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Classifying => "classifying",
            Self::AwaitingVideoChoice => "awaiting video choice",
            Self::AwaitingAudioChoice => "awaiting audio choice",
            Self::PreClean => "cleaning (pre)",
            Self::FetchingVideo => "fetching video",
            Self::FetchingAudio => "fetching audio",
            Self::Merging => "merging",
            Self::PostClean => "cleaning (post)",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Runs one download job at a time.
///
/// Artifact names are fixed, so two orchestrators must never share an
/// artifact directory; nothing here locks it.
pub struct DownloadOrchestrator {
    resolver: Box<dyn VideoResolver>,
    muxer: Box<dyn Muxer>,
    paths: ArtifactPaths,
    remover: Remover,
    stage: Stage,
    failed_during: Option<Stage>,
}

impl DownloadOrchestrator {
    pub fn new(
        resolver: Box<dyn VideoResolver>,
        muxer: Box<dyn Muxer>,
        paths: ArtifactPaths,
    ) -> Self {
        Self {
            resolver,
            muxer,
            paths,
            remover: cleaner::remove_file,
            stage: Stage::Idle,
            failed_during: None,
        }
    }

    /// Replace how artifacts are deleted during the clean stages
    pub fn with_remover(mut self, remover: Remover) -> Self {
        self.remover = remover;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Stage that was active when the last run failed
    pub fn failed_during(&self) -> Option<Stage> {
        self.failed_during
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!("[Orchestrator] {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    /// Resolve `url`, ask for both selections, then fetch and merge.
    ///
    /// The failure reason is printed to `console` before it is returned.
    /// Files written before a failure stay on disk: a failed audio fetch
    /// leaves the video file, a failed merge leaves both inputs (and maybe
    /// a partial output) for inspection. The next run's pre-clean removes
    /// them.
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        url: &str,
        console: &mut Console<R, W>,
    ) -> Result<JobOutcome, DownloadError> {
        self.failed_during = None;

        match self.execute(url, console).await {
            Ok(outcome) => {
                self.enter(Stage::Done);
                Ok(outcome)
            }
            Err(err) => {
                tracing::error!("[Orchestrator] Failed while {}: {}", self.stage, err);
                self.failed_during = Some(self.stage);
                self.enter(Stage::Failed);
                print(console.report_failure(&err));
                Err(err)
            }
        }
    }

    async fn execute<R: BufRead, W: Write>(
        &mut self,
        url: &str,
        console: &mut Console<R, W>,
    ) -> Result<JobOutcome, DownloadError> {
        self.enter(Stage::Resolving);
        tracing::info!("[Orchestrator] Resolving {} with {}", url, self.resolver.name());
        let info = self
            .resolver
            .resolve(url)
            .await
            .map_err(|source| DownloadError::Resolution {
                url: url.to_string(),
                source,
            })?;
        print(console.show_video(&info));

        self.enter(Stage::Classifying);
        let set = RenditionCatalog::classify(&info.renditions);
        set.require_audio(&info.id)?;
        print(console.show_renditions(&set));

        self.enter(Stage::AwaitingVideoChoice);
        let video_index = console.prompt_index(SelectionKind::Video, set.video.len())?;

        self.enter(Stage::AwaitingAudioChoice);
        let audio_index = console.prompt_index(SelectionKind::Audio, set.audio.len())?;

        let job = DownloadJob {
            video: set.video[video_index].clone(),
            audio: set.audio[audio_index].clone(),
            paths: self.paths.clone(),
        };
        tracing::info!(
            "[Orchestrator] Selected video {} ({}) and audio {} ({})",
            job.video.id,
            job.video.quality,
            job.audio.id,
            job.audio.quality
        );

        self.enter(Stage::PreClean);
        cleaner::clean_with(&job.paths.all(), self.remover);

        self.enter(Stage::FetchingVideo);
        let video_bytes = fetcher::fetch(self.resolver.as_ref(), &job.video, &job.paths.video)
            .await
            .map_err(DownloadError::VideoTransfer)?;

        self.enter(Stage::FetchingAudio);
        let audio_bytes = fetcher::fetch(self.resolver.as_ref(), &job.audio, &job.paths.audio)
            .await
            .map_err(DownloadError::AudioTransfer)?;

        self.enter(Stage::Merging);
        self.muxer
            .merge(&job.paths.video, &job.paths.audio, &job.paths.output)
            .await
            .map_err(|source| DownloadError::Merge {
                video: job.paths.video.clone(),
                audio: job.paths.audio.clone(),
                output: job.paths.output.clone(),
                source,
            })?;

        // the output exists at this point; cleanup problems are only warnings
        self.enter(Stage::PostClean);
        let warnings = cleaner::clean_with(&job.paths.intermediates(), self.remover);
        if !warnings.is_empty() {
            tracing::warn!(
                "[Orchestrator] {} intermediate file(s) left behind",
                warnings.len()
            );
        }

        print(console.report_success(&job.paths.output));

        Ok(JobOutcome {
            title: info.title,
            output: job.paths.output,
            video_bytes,
            audio_bytes,
        })
    }
}

/// Console output is best effort
fn print(result: io::Result<()>) {
    if let Err(e) = result {
        tracing::warn!("[Orchestrator] Could not write to console: {}", e);
    }
}
