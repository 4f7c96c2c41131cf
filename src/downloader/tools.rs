// External tool discovery (ffmpeg, yt-dlp)

use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolType {
    Ffmpeg,
    YtDlp,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::Ffmpeg => "ffmpeg",
            ToolType::YtDlp => "yt-dlp",
        }
    }

    fn version_arg(&self) -> &'static str {
        match self {
            ToolType::Ffmpeg => "-version", // ffmpeg uses a single dash
            ToolType::YtDlp => "--version",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub tool_type: ToolType,
    pub version: Option<String>,
    pub path: Option<PathBuf>,
    pub is_available: bool,
}

pub struct ToolManager {
    search_dirs: Vec<PathBuf>,
}

impl ToolManager {
    pub fn new() -> Self {
        Self {
            search_dirs: vec![
                PathBuf::from("/opt/homebrew/bin"), // Homebrew on Apple Silicon
                PathBuf::from("/usr/local/bin"),
                PathBuf::from("/usr/bin"),
            ],
        }
    }

    /// Search only `dirs` before falling back to PATH
    pub fn with_search_dirs(dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs: dirs }
    }

    /// Path to run `tool` with: `explicit`, then common install dirs, then
    /// PATH. Falls back to the bare binary name so the spawn error surfaces
    /// at the stage that needs the tool.
    pub fn resolve_binary(&self, tool: ToolType, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        self.locate(tool)
            .unwrap_or_else(|| PathBuf::from(tool.as_str()))
    }

    /// Find an installed binary, if any
    pub fn locate(&self, tool: ToolType) -> Option<PathBuf> {
        let binary_name = tool.as_str();

        // 1. Try common paths first
        for dir in &self.search_dirs {
            let candidate = dir.join(binary_name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        // 2. Try PATH
        which::which(binary_name).ok()
    }

    pub fn get_tool_info(&self, tool: ToolType) -> ToolInfo {
        let path = self.locate(tool);
        let version = path.as_deref().and_then(|p| self.get_version(p, tool));

        ToolInfo {
            name: tool.as_str().to_string(),
            tool_type: tool,
            version,
            is_available: path.is_some(),
            path,
        }
    }

    pub fn get_all_tools(&self) -> Vec<ToolInfo> {
        vec![
            self.get_tool_info(ToolType::Ffmpeg),
            self.get_tool_info(ToolType::YtDlp),
        ]
    }

    /// First line of the tool's version output
    pub fn get_version(&self, path: &Path, tool: ToolType) -> Option<String> {
        match Command::new(path).arg(tool.version_arg()).output() {
            Ok(output) if output.status.success() => {
                let out = String::from_utf8_lossy(&output.stdout);
                out.lines().next().map(|l| l.trim().to_string())
            }
            _ => None,
        }
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}
