// RenditionCatalog - splits a video's renditions into selectable groups
//
// Two pure passes over the same list:
// - primary: MIME "video" -> video group, MIME "audio" -> audio group
//   (a rendition naming both lands in both)
// - fallback: only when the primary audio group is empty, video renditions
//   with audio channels become the audio group

use super::errors::DownloadError;
use super::models::{RenditionDescriptor, RenditionSet};

pub struct RenditionCatalog;

impl RenditionCatalog {
    /// Group renditions for selection. Never fails; an empty `audio` group
    /// is for the caller to reject.
    pub fn classify(renditions: &[RenditionDescriptor]) -> RenditionSet {
        let (video, audio) = Self::primary_pass(renditions);

        if !audio.is_empty() {
            return RenditionSet {
                video,
                audio,
                combined: Vec::new(),
            };
        }

        tracing::info!("No separate audio formats found, looking for combined streams");
        let combined = Self::fallback_audio(renditions);

        RenditionSet {
            video,
            audio: combined.clone(),
            combined,
        }
    }

    /// First pass: `(video, audio)` by MIME token, order preserved
    pub fn primary_pass(
        renditions: &[RenditionDescriptor],
    ) -> (Vec<RenditionDescriptor>, Vec<RenditionDescriptor>) {
        let video = renditions.iter().filter(|r| r.is_video()).cloned().collect();
        let audio = renditions.iter().filter(|r| r.is_audio()).cloned().collect();
        (video, audio)
    }

    /// Video renditions that carry at least one audio channel
    pub fn fallback_audio(renditions: &[RenditionDescriptor]) -> Vec<RenditionDescriptor> {
        renditions
            .iter()
            .filter(|r| r.is_video() && r.audio_channels > 0)
            .cloned()
            .collect()
    }
}

impl RenditionSet {
    pub fn has_audio(&self) -> bool {
        !self.audio.is_empty()
    }

    /// `NoAudioAvailable` unless at least one audio rendition exists
    pub fn require_audio(&self, video_id: &str) -> Result<(), DownloadError> {
        if self.has_audio() {
            Ok(())
        } else {
            Err(DownloadError::NoAudioAvailable {
                video_id: video_id.to_string(),
            })
        }
    }

    /// Whether the audio group came from the combined-stream fallback
    pub fn used_fallback(&self) -> bool {
        !self.combined.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::MediaKind;

    fn make_video(id: &str, quality: &str) -> RenditionDescriptor {
        RenditionDescriptor::new(
            id,
            MediaKind::Video,
            quality,
            "video/mp4; codecs=\"avc1.4d401f\"",
            0,
        )
    }

    fn make_audio(id: &str, quality: &str) -> RenditionDescriptor {
        RenditionDescriptor::new(
            id,
            MediaKind::Audio,
            quality,
            "audio/mp4; codecs=\"mp4a.40.2\"",
            2,
        )
    }

    fn make_combined(id: &str, quality: &str, channels: u32) -> RenditionDescriptor {
        RenditionDescriptor::new(
            id,
            MediaKind::Combined,
            quality,
            "video/mp4; codecs=\"avc1.42001E, mp4a.40.2\"",
            channels,
        )
    }

    #[test]
    fn test_basic_split() {
        let renditions = vec![make_video("1", "720p"), make_audio("2", "128kbps")];
        let set = RenditionCatalog::classify(&renditions);

        assert_eq!(set.video.len(), 1);
        assert_eq!(set.video[0].id, "1");
        assert_eq!(set.audio.len(), 1);
        assert_eq!(set.audio[0].id, "2");
        assert!(set.combined.is_empty());
        assert!(set.has_audio());
        assert!(set.require_audio("abc").is_ok());
    }

    #[test]
    fn test_order_is_preserved() {
        let renditions = vec![
            make_video("137", "1080p"),
            make_audio("140", "128kbps"),
            make_video("136", "720p"),
            make_audio("251", "160kbps"),
            make_video("135", "480p"),
        ];
        let set = RenditionCatalog::classify(&renditions);

        let video_ids: Vec<&str> = set.video.iter().map(|r| r.id.as_str()).collect();
        let audio_ids: Vec<&str> = set.audio.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(video_ids, vec!["137", "136", "135"]);
        assert_eq!(audio_ids, vec!["140", "251"]);
    }

    #[test]
    fn test_both_tokens_land_in_both_groups() {
        let both = RenditionDescriptor::new("m", MediaKind::Combined, "", "video/x-audio", 2);
        let set = RenditionCatalog::classify(&[both]);

        assert_eq!(set.video.len(), 1);
        assert_eq!(set.audio.len(), 1);
        assert!(set.combined.is_empty());
    }

    #[test]
    fn test_fallback_skipped_when_audio_only_exists() {
        let renditions = vec![
            make_combined("18", "360p", 2),
            make_audio("140", "128kbps"),
            make_combined("22", "720p", 2),
            make_video("137", "1080p"),
        ];
        let set = RenditionCatalog::classify(&renditions);

        assert!(set.combined.is_empty());
        assert!(!set.used_fallback());
        assert_eq!(set.audio.len(), 1);
        assert_eq!(set.audio[0].id, "140");
        // combined streams are still selectable as video
        assert_eq!(set.video.len(), 3);
    }

    #[test]
    fn test_fallback_uses_combined_with_channels() {
        let renditions = vec![
            make_video("137", "1080p"),
            make_combined("18", "360p", 2),
            make_combined("43", "360p", 0),
            make_combined("22", "720p", 1),
        ];
        let set = RenditionCatalog::classify(&renditions);

        let audio_ids: Vec<&str> = set.audio.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(audio_ids, vec!["18", "22"]);
        assert_eq!(set.combined, set.audio);
        assert!(set.used_fallback());
        assert_eq!(set.video.len(), 4);
    }

    #[test]
    fn test_no_audio_capable_renditions() {
        let renditions = vec![make_video("137", "1080p"), make_combined("43", "360p", 0)];
        let set = RenditionCatalog::classify(&renditions);

        assert!(!set.has_audio());
        assert!(set.combined.is_empty());
        assert!(matches!(
            set.require_audio("abc"),
            Err(DownloadError::NoAudioAvailable { video_id }) if video_id == "abc"
        ));
    }

    #[test]
    fn test_empty_input() {
        let set = RenditionCatalog::classify(&[]);
        assert_eq!(set, RenditionSet::default());
        assert!(!set.has_audio());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let renditions = vec![
            make_video("137", "1080p"),
            make_combined("18", "360p", 2),
            make_audio("140", "128kbps"),
        ];
        let first = RenditionCatalog::classify(&renditions);
        let second = RenditionCatalog::classify(&renditions);
        assert_eq!(first, second);
    }
}
