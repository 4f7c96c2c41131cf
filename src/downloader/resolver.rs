// yt-dlp backed video resolution
//
// `yt-dlp --dump-json` supplies the metadata and the direct media URL of
// every format; the bytes themselves are fetched over plain HTTP.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use serde_json::Value;
use tokio_util::io::StreamReader;

use super::errors::{ConfigError, ResolveError};
use super::models::{MediaKind, RenditionDescriptor, VideoInfo};
use super::traits::{MediaStream, VideoResolver};
use super::utils::{normalize_video_url, run_output_with_timeout, tail_lines};

pub struct YtDlpResolver {
    ytdlp_path: PathBuf,
    proxy: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl YtDlpResolver {
    pub fn new(
        ytdlp_path: PathBuf,
        proxy: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(proxy_url) = proxy.as_deref() {
            let proxy =
                reqwest::Proxy::all(proxy_url).map_err(|source| ConfigError::InvalidProxy {
                    proxy: proxy_url.to_string(),
                    source,
                })?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().map_err(ConfigError::HttpClient)?;

        Ok(Self {
            ytdlp_path,
            proxy,
            timeout,
            client,
        })
    }

    fn build_args(&self, url: &str) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
        ];

        if let Some(proxy) = &self.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args.push(url.to_string());
        args
    }

    /// Parse `--dump-json` output
    pub fn parse_json(stdout: &[u8]) -> Result<VideoInfo, ResolveError> {
        let json: Value = serde_json::from_slice(stdout)
            .map_err(|e| ResolveError::ParseError(format!("Invalid JSON: {}", e)))?;

        let renditions = Self::parse_formats(&json)?;

        Ok(VideoInfo {
            id: json["id"].as_str().unwrap_or("unknown").to_string(),
            title: json["title"].as_str().unwrap_or("Unknown").to_string(),
            uploader: json["uploader"].as_str().unwrap_or("Unknown").to_string(),
            duration_seconds: json["duration"].as_f64().unwrap_or(0.0) as u64,
            renditions,
        })
    }

    fn parse_formats(json: &Value) -> Result<Vec<RenditionDescriptor>, ResolveError> {
        let formats_array = json["formats"]
            .as_array()
            .ok_or_else(|| ResolveError::ParseError("No formats array in JSON".to_string()))?;

        Ok(formats_array.iter().filter_map(Self::parse_format).collect())
    }

    /// `None` for entries that cannot be streamed as a single file
    fn parse_format(f: &Value) -> Option<RenditionDescriptor> {
        let url = f["url"].as_str()?;

        // manifests (m3u8, dash) need a segment downloader
        let protocol = f["protocol"].as_str().unwrap_or("https");
        if protocol != "https" && protocol != "http" {
            return None;
        }

        let ext = f["ext"].as_str().unwrap_or("mp4");
        let vcodec = Codec::from_value(&f["vcodec"]);
        let acodec = Codec::from_value(&f["acodec"]);
        let kind = match (vcodec, acodec) {
            (Codec::Absent, Codec::Absent) => return None, // storyboards and friends
            (Codec::Absent, _) => MediaKind::Audio,
            (_, Codec::Absent) => MediaKind::Video,
            (Codec::Known(_), Codec::Known(_)) => MediaKind::Combined,
            (Codec::Known(_), Codec::Unknown) => MediaKind::Video,
            (Codec::Unknown, Codec::Known(_)) => MediaKind::Audio,
            // generic extractors often report no codecs at all
            (Codec::Unknown, Codec::Unknown) => guess_kind(f, ext),
        };

        let major = match kind {
            MediaKind::Audio => "audio",
            MediaKind::Video | MediaKind::Combined => "video",
        };
        let codecs: Vec<&str> = [vcodec.name(), acodec.name()].into_iter().flatten().collect();
        let mime_type = if codecs.is_empty() {
            format!("{}/{}", major, ext)
        } else {
            format!("{}/{}; codecs=\"{}\"", major, ext, codecs.join(", "))
        };

        let format_id = f["format_id"].as_str().unwrap_or("").to_string();
        let quality = quality_label(f).unwrap_or_else(|| format_id.clone());
        let audio_channels = f["audio_channels"].as_u64().unwrap_or(0) as u32;

        let headers: BTreeMap<String, String> = f["http_headers"]
            .as_object()
            .map(|h| {
                h.iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Some(
            RenditionDescriptor::new(format_id, kind, quality, mime_type, audio_channels)
                .with_url(url)
                .with_headers(headers),
        )
    }
}

/// yt-dlp codec field: "none" means the stream is absent, null or a
/// missing key means the extractor does not know
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Codec<'a> {
    Known(&'a str),
    Unknown,
    Absent,
}

impl<'a> Codec<'a> {
    fn from_value(value: &'a Value) -> Self {
        match value.as_str() {
            Some("none") => Codec::Absent,
            Some(c) if !c.is_empty() => Codec::Known(c),
            _ => Codec::Unknown,
        }
    }

    fn name(self) -> Option<&'a str> {
        match self {
            Codec::Known(c) => Some(c),
            _ => None,
        }
    }
}

const AUDIO_EXTENSIONS: &[&str] = &[
    "m4a", "mp3", "aac", "opus", "ogg", "oga", "wav", "flac", "weba",
];

/// Kind of a format whose codecs are both unknown
fn guess_kind(f: &Value, ext: &str) -> MediaKind {
    let audio_only = f["resolution"].as_str() == Some("audio only")
        || AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str());
    if audio_only {
        MediaKind::Audio
    } else {
        MediaKind::Combined
    }
}

fn quality_label(f: &Value) -> Option<String> {
    if let Some(note) = f["format_note"].as_str().filter(|n| !n.is_empty()) {
        return Some(note.to_string());
    }
    if let Some(res) = f["resolution"]
        .as_str()
        .filter(|r| !r.is_empty() && *r != "audio only")
    {
        return Some(res.to_string());
    }
    f["abr"].as_f64().map(|abr| format!("{:.0}kbps", abr))
}

#[async_trait]
impl VideoResolver for YtDlpResolver {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn resolve(&self, url: &str) -> Result<VideoInfo, ResolveError> {
        let url = normalize_video_url(url)?;
        let args = self.build_args(&url);
        tracing::debug!("[yt-dlp] {} {}", self.ytdlp_path.display(), args.join(" "));

        let output = run_output_with_timeout(&self.ytdlp_path, &args, Some(self.timeout))
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ResolveError::ToolNotFound(format!(
                    "{}: {}",
                    self.ytdlp_path.display(),
                    e
                )),
                _ => ResolveError::ExecutionError(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = tail_lines(&output.stderr, 3);
            tracing::debug!("[yt-dlp] failed: {}", stderr);
            return Err(ResolveError::ExecutionError(if stderr.is_empty() {
                format!("yt-dlp exited with {:?}", output.status.code())
            } else {
                stderr
            }));
        }

        let info = Self::parse_json(&output.stdout)?;
        tracing::info!(
            id = %info.id,
            renditions = info.renditions.len(),
            "Resolved \"{}\"",
            info.title
        );
        Ok(info)
    }

    async fn open_stream(
        &self,
        rendition: &RenditionDescriptor,
    ) -> Result<MediaStream, ResolveError> {
        let url = rendition.url.as_deref().ok_or_else(|| {
            ResolveError::Stream(format!("rendition {} has no media URL", rendition.id))
        })?;

        let mut request = self.client.get(url);
        for (name, value) in &rendition.http_headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ResolveError::Stream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ResolveError::Stream(format!("HTTP {}", response.status())));
        }

        let body = Box::pin(response.bytes_stream().map_err(io::Error::other));
        Ok(Box::new(StreamReader::new(body)))
    }
}
