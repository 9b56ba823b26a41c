use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Which external tools the current environment provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolAvailability {
    /// ffmpeg on PATH
    pub ffmpeg: bool,
    /// exiftool on PATH
    pub exiftool: bool,
    /// colmap on PATH
    pub colmap: bool,
    /// meshroom found on PATH or in a common install location
    pub meshroom: bool,
    /// an NVIDIA GPU reachable through nvidia-smi
    pub cuda: bool,
}

/// Probe the external tools the pipeline shells out to, plus CUDA.
///
/// Each probe runs the tool's cheapest self-identifying command and only
/// checks that it launches and exits successfully.
pub fn check_dependencies() -> ToolAvailability {
    ToolAvailability {
        ffmpeg: probe("ffmpeg", &["-version"]),
        exiftool: probe("exiftool", &["-ver"]),
        colmap: probe("colmap", &["-h"]),
        meshroom: probe_meshroom(),
        cuda: probe("nvidia-smi", &[]),
    }
}

fn probe(tool: &str, args: &[&str]) -> bool {
    Command::new(tool)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Meshroom installs rarely end up on PATH; also try the capitalized
/// binary and the default per-user install location.
fn probe_meshroom() -> bool {
    let mut candidates = vec![PathBuf::from("meshroom"), PathBuf::from("Meshroom")];
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join("Meshroom").join("meshroom"));
    }
    candidates
        .iter()
        .any(|path| probe(&path.to_string_lossy(), &["-h"]))
}
