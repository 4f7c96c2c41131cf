use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use commandline_youtube::build_orchestrator;
use commandline_youtube::downloader::{
    Console, DownloadError, DownloaderConfig, MenuChoice, ToolManager,
};
use commandline_youtube::logging::{self, LogOptions};

#[derive(Debug, Parser)]
#[command(name = "commandline-youtube", version)]
#[command(
    about = "Pick a video's video and audio formats, download both and merge them with ffmpeg"
)]
#[command(
    after_help = "Writes video.mp4, audio.mp3 and output.mp4 in the working directory. \
                  Run only one instance per directory."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Video URL or id; skips the menu and the URL prompt
    #[arg(long)]
    url: Option<String>,

    /// ffmpeg binary to merge with
    #[arg(long, env = "FFMPEG_PATH")]
    ffmpeg: Option<PathBuf>,

    /// yt-dlp binary to resolve videos with
    #[arg(long = "yt-dlp", env = "YTDLP_PATH")]
    ytdlp: Option<PathBuf>,

    /// HTTP or SOCKS5 proxy for resolution and downloads
    #[arg(long, env = "YTDL_PROXY")]
    proxy: Option<String>,

    /// Seconds to wait for yt-dlp to resolve a video
    #[arg(long, default_value_t = 30)]
    resolve_timeout: u64,

    /// Show where ffmpeg and yt-dlp were found, then exit
    #[arg(long, default_value_t = false)]
    tools: bool,
}

impl Cli {
    fn config(&self) -> DownloaderConfig {
        DownloaderConfig::default()
            .with_ffmpeg_path(self.ffmpeg.clone())
            .with_ytdlp_path(self.ytdlp.clone())
            .with_proxy(self.proxy.clone())
            .with_resolve_timeout(self.resolve_timeout)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(LogOptions {
        debug: cli.debug,
        use_color: true,
    })
    .context("failed to initialize logging")?;

    if cli.tools {
        print_tools();
        return Ok(());
    }

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    let url = match &cli.url {
        Some(url) => url.clone(),
        None => {
            if console.main_menu()? == MenuChoice::Quit {
                return Ok(());
            }
            console.prompt_url()?
        }
    };

    let config = cli.config();
    let mut orchestrator = match build_orchestrator(&config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            let err = DownloadError::from(e);
            tracing::error!("{}", err);
            console.report_failure(&err)?;
            std::process::exit(err.exit_code());
        }
    };

    match orchestrator.run(&url, &mut console).await {
        Ok(outcome) => {
            tracing::info!(
                "\"{}\" saved to {} ({} + {} bytes downloaded)",
                outcome.title,
                outcome.output.display(),
                outcome.video_bytes,
                outcome.audio_bytes
            );
            Ok(())
        }
        // the reason has already been printed to the console
        Err(e) => std::process::exit(e.exit_code()),
    }
}

fn print_tools() {
    for tool in ToolManager::new().get_all_tools() {
        match (&tool.path, &tool.version) {
            (Some(path), Some(version)) => {
                println!("{}: {} ({})", tool.name, path.display(), version)
            }
            (Some(path), None) => println!("{}: {} (version unknown)", tool.name, path.display()),
            (None, _) => println!("{}: not found", tool.name),
        }
    }
}
