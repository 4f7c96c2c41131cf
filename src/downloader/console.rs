// Interactive console: prompts, rendition lists and the final report
//
// Generic over reader and writer so runs can be scripted in tests.

use std::io::{self, BufRead, Write};
use std::path::Path;

use super::errors::{DownloadError, SelectionKind};
use super::models::{RenditionDescriptor, RenditionSet, VideoInfo};

/// Top-level menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Download,
    Quit,
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// One trimmed line; EOF reads as an empty line
    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn prompt(&mut self, text: &str) -> io::Result<String> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        self.read_line()
    }

    pub fn main_menu(&mut self) -> io::Result<MenuChoice> {
        writeln!(self.output, "Welcome to Command Line Youtube!")?;
        writeln!(self.output, "What would you like to do? (1-9)")?;
        writeln!(self.output, "(1) Download a YouTube video")?;

        let choice = self.read_line()?;
        if choice.parse::<u32>().ok() == Some(1) {
            Ok(MenuChoice::Download)
        } else {
            writeln!(self.output, "Invalid choice selected! Goodbye!")?;
            Ok(MenuChoice::Quit)
        }
    }

    pub fn prompt_url(&mut self) -> io::Result<String> {
        self.prompt("Enter the YouTube video URL: ")
    }

    pub fn show_video(&mut self, info: &VideoInfo) -> io::Result<()> {
        writeln!(
            self.output,
            "{} by {} ({})",
            info.title,
            info.uploader,
            info.duration_label()
        )
    }

    pub fn show_renditions(&mut self, set: &RenditionSet) -> io::Result<()> {
        writeln!(self.output, "Available video formats:")?;
        for (i, r) in set.video.iter().enumerate() {
            self.write_rendition(i, r)?;
        }

        if set.used_fallback() {
            writeln!(
                self.output,
                "Available audio formats (combined streams, no separate audio found):"
            )?;
        } else {
            writeln!(self.output, "Available audio formats:")?;
        }
        for (i, r) in set.audio.iter().enumerate() {
            self.write_rendition(i, r)?;
        }
        Ok(())
    }

    fn write_rendition(&mut self, index: usize, r: &RenditionDescriptor) -> io::Result<()> {
        writeln!(
            self.output,
            "{}: {} (Kind: {}, Quality: {}, Id: {})",
            index, r.mime_type, r.kind, r.quality, r.id
        )
    }

    /// Read a zero-based index into a list of `len` entries. Anything that
    /// is not an in-range number is rejected; there is no second attempt.
    pub fn prompt_index(
        &mut self,
        kind: SelectionKind,
        len: usize,
    ) -> Result<usize, DownloadError> {
        let text = format!("Enter the number of the desired {} quality: ", kind);
        // an unreadable console is the same as no answer
        let input = self.prompt(&text).unwrap_or_default();

        match input.parse::<usize>() {
            Ok(index) if index < len => Ok(index),
            _ => Err(DownloadError::InvalidSelection {
                kind,
                input,
                available: len,
            }),
        }
    }

    pub fn report_success(&mut self, output: &Path) -> io::Result<()> {
        writeln!(
            self.output,
            "Video and audio downloaded and merged successfully: {}",
            output.display()
        )
    }

    pub fn report_failure(&mut self, err: &DownloadError) -> io::Result<()> {
        writeln!(self.output, "Error downloading video: {}", err)
    }
}
