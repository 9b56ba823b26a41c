use std::path::PathBuf;

/// Resolution tier for extracted frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameQuality {
    /// Native resolution
    #[default]
    High,
    /// Half resolution
    Medium,
    /// Quarter resolution
    Low,
}

impl FrameQuality {
    /// The ffmpeg scale filter for this tier, `None` for native resolution.
    pub fn scale_filter(self) -> Option<&'static str> {
        match self {
            FrameQuality::High => None,
            FrameQuality::Medium => Some("scale=iw/2:ih/2"),
            FrameQuality::Low => Some("scale=iw/4:ih/4"),
        }
    }
}

impl std::str::FromStr for FrameQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(FrameQuality::High),
            "medium" => Ok(FrameQuality::Medium),
            "low" => Ok(FrameQuality::Low),
            other => Err(format!("unknown quality tier: {other}")),
        }
    }
}

/// Which photogrammetry backend consumes the pipeline's outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconstructionEngine {
    /// COLMAP, driven through its three-stage CLI
    #[default]
    Colmap,
    /// Meshroom/AliceVision, consuming the sensor XML
    Meshroom,
}

impl std::str::FromStr for ReconstructionEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "colmap" => Ok(ReconstructionEngine::Colmap),
            "meshroom" => Ok(ReconstructionEngine::Meshroom),
            other => Err(format!("unknown reconstruction engine: {other}")),
        }
    }
}

/// Everything a pipeline run needs, passed explicitly into each stage.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Source drone video
    pub video: PathBuf,
    /// Directory receiving all pipeline artifacts
    pub output_dir: PathBuf,
    /// Keep one frame of every `frame_step` video frames
    pub frame_step: u32,
    /// Extracted frame resolution tier
    pub quality: FrameQuality,
    /// Pass GPU flags to tools that accept them
    pub use_gpu: bool,
    /// Feed the exported GPS poses to reconstruction as a position prior
    pub use_gps_metadata: bool,
    /// Smooth the GPS trajectory before export
    pub smooth_gps: bool,
    /// Moving-average window for smoothing
    pub smoothing_window: usize,
    /// Photogrammetry backend
    pub engine: ReconstructionEngine,
}

impl PipelineConfig {
    /// A config with the defaults the original tool shipped, ready to have
    /// paths filled in.
    pub fn new(video: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            video: video.into(),
            output_dir: output_dir.into(),
            frame_step: 1,
            quality: FrameQuality::High,
            use_gpu: true,
            use_gps_metadata: true,
            smooth_gps: false,
            smoothing_window: dronemap_gps::smoothing::DEFAULT_WINDOW,
            engine: ReconstructionEngine::Colmap,
        }
    }

    /// Directory the extracted frames land in.
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// Per-frame timestamp table.
    pub fn timestamps_file(&self) -> PathBuf {
        self.output_dir.join("timestamps.csv")
    }

    /// Raw exiftool dump.
    pub fn metadata_file(&self) -> PathBuf {
        self.output_dir.join("gps_metadata.json")
    }

    /// ECEF pose CSV.
    pub fn gps_csv(&self) -> PathBuf {
        self.output_dir.join("gps_poses.csv")
    }

    /// Meshroom sensor description.
    pub fn sensor_xml(&self) -> PathBuf {
        self.output_dir.join("sensor_data.xml")
    }

    /// Reconstruction working directory.
    pub fn photogrammetry_dir(&self) -> PathBuf {
        self.output_dir.join("photogrammetry")
    }
}
