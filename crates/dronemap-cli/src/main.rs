use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;

use dronemap_pipeline::{
    check_dependencies, extract_frames, extract_gps, find_model_artifact, run_pipeline,
    run_reconstruction, FrameQuality, PipelineConfig, PipelineError, ReconstructionEngine,
};

#[derive(FromArgs)]
/// Turn a drone video into a georeferenced 3D reconstruction by driving
/// ffmpeg, exiftool and COLMAP.
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Check(CheckArgs),
    Frames(FramesArgs),
    Gps(GpsArgs),
    Reconstruct(ReconstructArgs),
    Run(RunArgs),
}

#[derive(FromArgs)]
#[argh(subcommand, name = "check")]
/// report which external tools are available
struct CheckArgs {}

#[derive(FromArgs)]
#[argh(subcommand, name = "frames")]
/// extract frames and per-frame timestamps from the video
struct FramesArgs {
    /// path to the drone video
    #[argh(option)]
    video: PathBuf,
    /// output directory for pipeline artifacts
    #[argh(option)]
    output: PathBuf,
    /// keep one frame of every N video frames
    #[argh(option, default = "1")]
    step: u32,
    /// frame resolution tier: high, medium or low
    #[argh(option, default = "FrameQuality::High", from_str_fn(parse_quality))]
    quality: FrameQuality,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "gps")]
/// extract GPS metadata and export pose files
struct GpsArgs {
    /// path to the drone video
    #[argh(option)]
    video: PathBuf,
    /// output directory for pipeline artifacts
    #[argh(option)]
    output: PathBuf,
    /// smooth the GPS trajectory before export
    #[argh(switch)]
    smooth: bool,
    /// moving-average window used with --smooth
    #[argh(option, default = "dronemap_gps::smoothing::DEFAULT_WINDOW")]
    window: usize,
    /// reconstruction engine the exports target: colmap or meshroom
    #[argh(option, default = "ReconstructionEngine::Colmap", from_str_fn(parse_engine))]
    engine: ReconstructionEngine,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "reconstruct")]
/// run the photogrammetry backend over previously extracted frames
struct ReconstructArgs {
    /// output directory holding the extracted frames
    #[argh(option)]
    output: PathBuf,
    /// reconstruction engine: colmap or meshroom
    #[argh(option, default = "ReconstructionEngine::Colmap", from_str_fn(parse_engine))]
    engine: ReconstructionEngine,
    /// disable GPU acceleration flags
    #[argh(switch)]
    no_gpu: bool,
    /// reconstruct without the GPS pose prior
    #[argh(switch)]
    no_gps_prior: bool,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "run")]
/// run the full pipeline: frames, gps, reconstruction
struct RunArgs {
    /// path to the drone video
    #[argh(option)]
    video: PathBuf,
    /// output directory for pipeline artifacts
    #[argh(option)]
    output: PathBuf,
    /// keep one frame of every N video frames
    #[argh(option, default = "1")]
    step: u32,
    /// frame resolution tier: high, medium or low
    #[argh(option, default = "FrameQuality::High", from_str_fn(parse_quality))]
    quality: FrameQuality,
    /// smooth the GPS trajectory before export
    #[argh(switch)]
    smooth: bool,
    /// reconstruction engine: colmap or meshroom
    #[argh(option, default = "ReconstructionEngine::Colmap", from_str_fn(parse_engine))]
    engine: ReconstructionEngine,
    /// disable GPU acceleration flags
    #[argh(switch)]
    no_gpu: bool,
    /// reconstruct without the GPS pose prior
    #[argh(switch)]
    no_gps_prior: bool,
}

fn parse_quality(s: &str) -> Result<FrameQuality, String> {
    s.parse()
}

fn parse_engine(s: &str) -> Result<ReconstructionEngine, String> {
    s.parse()
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Args = argh::from_env();

    match dispatch(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Command) -> Result<(), PipelineError> {
    match command {
        Command::Check(_) => {
            let tools = check_dependencies();
            let report = |name: &str, present: bool| {
                println!("{name:10} {}", if present { "found" } else { "missing" });
            };
            report("ffmpeg", tools.ffmpeg);
            report("exiftool", tools.exiftool);
            report("colmap", tools.colmap);
            report("meshroom", tools.meshroom);
            report("cuda", tools.cuda);
            Ok(())
        }
        Command::Frames(args) => {
            let mut config = PipelineConfig::new(args.video, args.output);
            config.frame_step = args.step;
            config.quality = args.quality;
            let frames_dir = extract_frames(&config)?;
            println!("frames extracted to {}", frames_dir.display());
            Ok(())
        }
        Command::Gps(args) => {
            let mut config = PipelineConfig::new(args.video, args.output);
            config.smooth_gps = args.smooth;
            config.smoothing_window = args.window;
            config.engine = args.engine;
            let trajectory = extract_gps(&config)?;
            println!(
                "{} GPS poses written to {}",
                trajectory.len(),
                config.gps_csv().display()
            );
            Ok(())
        }
        Command::Reconstruct(args) => {
            // video path is unused by this stage
            let mut config = PipelineConfig::new(PathBuf::new(), args.output);
            config.engine = args.engine;
            config.use_gpu = !args.no_gpu;
            config.use_gps_metadata = !args.no_gps_prior;
            let photo_dir = run_reconstruction(&config)?;
            report_artifact(&photo_dir, config.engine);
            Ok(())
        }
        Command::Run(args) => {
            let mut config = PipelineConfig::new(args.video, args.output);
            config.frame_step = args.step;
            config.quality = args.quality;
            config.smooth_gps = args.smooth;
            config.engine = args.engine;
            config.use_gpu = !args.no_gpu;
            config.use_gps_metadata = !args.no_gps_prior;
            let photo_dir = run_pipeline(&config)?;
            report_artifact(&photo_dir, config.engine);
            Ok(())
        }
    }
}

fn report_artifact(photo_dir: &std::path::Path, engine: ReconstructionEngine) {
    match find_model_artifact(photo_dir, engine) {
        Some(model) => println!("model artifact: {}", model.display()),
        None => println!(
            "reconstruction finished in {} (no dense mesh artifact yet)",
            photo_dir.display()
        ),
    }
}
