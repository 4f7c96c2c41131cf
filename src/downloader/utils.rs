// Helper functions shared by the resolver and the muxer

use std::io;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use regex::Regex;
use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use super::errors::ResolveError;

lazy_static::lazy_static! {
    static ref VIDEO_ID_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap();
    static ref HTTP_URL_RE: Regex = Regex::new(r"^(?i)https?://[^\s/$.?#][^\s]*$").unwrap();
}

/// Turn user input into something yt-dlp accepts.
///
/// Bare 11-character video ids become watch URLs; http(s) URLs pass
/// through; anything else is rejected.
pub fn normalize_video_url(input: &str) -> Result<String, ResolveError> {
    let input = input.trim();

    if VIDEO_ID_RE.is_match(input) {
        return Ok(format!("https://www.youtube.com/watch?v={}", input));
    }
    if HTTP_URL_RE.is_match(input) {
        return Ok(input.to_string());
    }

    Err(ResolveError::InvalidUrl(input.to_string()))
}

/// Run a command to completion with captured output. `None` waits forever.
pub async fn run_output_with_timeout(
    program: &Path,
    args: &[String],
    limit: Option<Duration>,
) -> io::Result<Output> {
    let mut child = TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("stdout was not captured"))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("stderr was not captured"))?;

    // drain both pipes while waiting so a chatty child cannot block on a full pipe
    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });

    let status = match limit {
        Some(limit) => match timeout(limit, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                let _ = child.kill().await;
                stdout_task.abort();
                stderr_task.abort();
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("timed out after {}s", limit.as_secs()),
                ));
            }
        },
        None => child.wait().await?,
    };

    let stdout = stdout_task.await.map_err(io::Error::other)??;
    let stderr = stderr_task.await.map_err(io::Error::other)??;
    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

/// Last `n` non-empty lines of process output, joined with " | "
pub fn tail_lines(bytes: &[u8], n: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join(" | ")
}
