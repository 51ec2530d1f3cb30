use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};

use face_privacy_core::compositing::domain::display_layout::DisplayLayout;
use face_privacy_core::control::domain::control_input::{ControlInput, NoControlInput};
use face_privacy_core::control::infrastructure::stdin_control_input::StdinControlInput;
use face_privacy_core::detection::domain::face_detector::FaceDetector;
use face_privacy_core::detection::infrastructure::onnx_yolo_detector::OnnxYoloDetector;
use face_privacy_core::effects::domain::effect_kind::EffectKind;
use face_privacy_core::effects::domain::effect_state::EffectState;
use face_privacy_core::effects::infrastructure::cpu_effect_engine::CpuEffectEngine;
use face_privacy_core::effects::infrastructure::emoji::EmojiAsset;
use face_privacy_core::pipeline::frame_orchestrator::FrameOrchestrator;
use face_privacy_core::pipeline::session::{Session, SessionReport};
use face_privacy_core::pipeline::session_config::SessionConfig;
use face_privacy_core::shared::constants::{
    DEFAULT_CONFIDENCE, DEFAULT_INTENSITY, DEFAULT_SCREENSHOT_DIR, IMAGE_EXTENSIONS,
    YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use face_privacy_core::shared::model_resolver;
use face_privacy_core::video::domain::frame_sink::FrameSink;
use face_privacy_core::video::domain::frame_source::FrameSource;
use face_privacy_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use face_privacy_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;
use face_privacy_core::video::infrastructure::image_file_reader::ImageFileReader;
use face_privacy_core::video::infrastructure::image_file_sink::ImageFileSink;

#[cfg(target_os = "macos")]
const DEFAULT_DEVICE: &str = "0";
#[cfg(target_os = "windows")]
const DEFAULT_DEVICE: &str = "video=Integrated Camera";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const DEFAULT_DEVICE: &str = "/dev/video0";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    Camera,
    Video,
    Image,
}

/// Real-time face anonymization for cameras, videos and images.
///
/// In camera mode, type a key and press Enter to control the session:
/// 1-6 select effect, +/- intensity, space (or a bare Enter) split view,
/// s screenshot, h help, q quit.
#[derive(Parser, Debug)]
#[command(name = "face-privacy")]
struct Cli {
    /// Where frames come from.
    #[arg(long, value_enum, default_value = "camera")]
    source: SourceKind,

    /// Input video or image file (video and image sources).
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output file. Required for video and image sources; records the
    /// session when given with a camera.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Capture device for the camera source.
    #[arg(long, default_value = DEFAULT_DEVICE)]
    device: String,

    /// Effect: pixelate, blur, blackbox, emoji, colorize, witness.
    #[arg(long, default_value = "pixelate")]
    effect: EffectKind,

    /// Effect intensity, clamped to 5-50.
    #[arg(long, default_value_t = DEFAULT_INTENSITY)]
    intensity: u8,

    /// Side-by-side original/protected output with a title bar.
    #[arg(long)]
    demo: bool,

    /// Hide the FPS / faces / effect panel.
    #[arg(long)]
    no_info: bool,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Image used by the emoji effect instead of the built-in smiley.
    #[arg(long)]
    emoji_asset: Option<PathBuf>,

    /// Directory for screenshots.
    #[arg(long, default_value = DEFAULT_SCREENSHOT_DIR)]
    screenshot_dir: PathBuf,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let detector = build_detector(cli.confidence)?;
    let engine = CpuEffectEngine::with_emoji(load_emoji(cli.emoji_asset.as_deref()));
    let orchestrator = FrameOrchestrator::new(detector, Box::new(engine));

    let config = build_config(&cli);
    let input_path = match cli.source {
        SourceKind::Camera => PathBuf::from(&cli.device),
        SourceKind::Video | SourceKind::Image => cli.input.clone().ok_or("--input is required")?,
    };

    let mut session = Session::new(open_source(cli.source), orchestrator, config)
        .with_input(open_controls(cli.source));
    if let Some(output) = &cli.output {
        session = session.with_sink(open_sink(cli.source, output), output.clone());
    }
    if let Some(hint) = discard_hint(&cli) {
        log::warn!("{hint}");
    }

    let report = session.run(&input_path)?;
    print_report(&report, cli.output.as_deref());
    Ok(())
}

fn build_config(cli: &Cli) -> SessionConfig {
    let initial_state = EffectState::new(cli.effect, DEFAULT_INTENSITY).with_intensity(cli.intensity);
    if initial_state.intensity() != cli.intensity {
        log::warn!(
            "Intensity {} out of range, using {}",
            cli.intensity,
            initial_state.intensity()
        );
    }

    SessionConfig {
        initial_state,
        layout: if cli.demo {
            DisplayLayout::SideBySide { title_bar: true }
        } else {
            DisplayLayout::Single
        },
        show_info: !cli.no_info,
        screenshot_dir: cli.screenshot_dir.clone(),
        ..SessionConfig::default()
    }
}

/// A camera run without `--output` only keeps screenshots.
fn discard_hint(cli: &Cli) -> Option<String> {
    if cli.source != SourceKind::Camera || cli.output.is_some() {
        return None;
    }
    Some(format!(
        "No --output given: processed frames are discarded, only screenshots ('s') are saved to {}",
        cli.screenshot_dir.display()
    ))
}

fn build_detector(confidence: f64) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        None,
        Some(Box::new(download_progress)),
    )?;
    Ok(Box::new(OnnxYoloDetector::new(&model_path, confidence)?))
}

/// A missing or unreadable asset is not fatal: the emoji effect falls back to
/// a black box.
fn load_emoji(path: Option<&Path>) -> Option<EmojiAsset> {
    match path {
        None => Some(EmojiAsset::smiley()),
        Some(path) => match EmojiAsset::load(path) {
            Ok(asset) => Some(asset),
            Err(e) => {
                log::warn!("{e}; emoji effect will draw black boxes");
                None
            }
        },
    }
}

fn open_source(kind: SourceKind) -> Box<dyn FrameSource> {
    match kind {
        SourceKind::Camera => Box::new(FfmpegReader::camera()),
        SourceKind::Video => Box::new(FfmpegReader::new()),
        SourceKind::Image => Box::new(ImageFileReader::new()),
    }
}

fn open_sink(kind: SourceKind, output: &Path) -> Box<dyn FrameSink> {
    if kind == SourceKind::Image || is_image(output) {
        Box::new(ImageFileSink::new())
    } else {
        Box::new(FfmpegWriter::new())
    }
}

fn open_controls(kind: SourceKind) -> Box<dyn ControlInput> {
    match kind {
        SourceKind::Camera => Box::new(StdinControlInput::spawn()),
        SourceKind::Video | SourceKind::Image => Box::new(NoControlInput),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match (cli.source, &cli.input) {
        (SourceKind::Camera, Some(_)) => {
            return Err("--input is not used with --source camera (use --device)".into());
        }
        (SourceKind::Video | SourceKind::Image, None) => {
            return Err("--input is required for video and image sources".into());
        }
        (_, Some(input)) if !input.exists() => {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
        _ => {}
    }
    if cli.source != SourceKind::Camera && cli.output.is_none() {
        return Err("--output is required for video and image sources".into());
    }
    if cli.source == SourceKind::Image {
        if let Some(output) = &cli.output {
            if !is_image(output) {
                return Err(format!(
                    "Image output must have an image extension ({}), got {}",
                    IMAGE_EXTENSIONS.join(", "),
                    output.display()
                )
                .into());
            }
        }
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if let Some(asset) = &cli.emoji_asset {
        if !asset.exists() {
            log::warn!("Emoji asset not found: {}", asset.display());
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn print_report(report: &SessionReport, output: Option<&Path>) {
    log::info!(
        "Processed {} frames, {} faces anonymized ({} detector failures)",
        report.frames,
        report.faces_total,
        report.detection_failures
    );
    for shot in &report.screenshots {
        log::info!("Screenshot: {}", shot.display());
    }
    if let Some(output) = output {
        log::info!("Output written to {}", output.display());
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use face_privacy_core::shared::constants::{MAX_INTENSITY, MIN_INTENSITY};

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["face-privacy"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.source, SourceKind::Camera);
        assert_eq!(cli.effect, EffectKind::Pixelate);
        assert_eq!(cli.intensity, DEFAULT_INTENSITY);
        assert_eq!(cli.device, DEFAULT_DEVICE);
        assert!(validate(&cli).is_ok());
    }

    #[test]
    fn test_effect_names_parse() {
        assert_eq!(parse(&["--effect", "witness"]).effect, EffectKind::WitnessProtection);
        assert_eq!(parse(&["--effect", "BlackBox"]).effect, EffectKind::BlackBox);
        assert!(Cli::try_parse_from(["face-privacy", "--effect", "sparkles"]).is_err());
    }

    #[test]
    fn test_effect_and_intensity_reach_config() {
        let config = build_config(&parse(&["--effect", "blur", "--intensity", "35"]));
        assert_eq!(config.initial_state.kind, EffectKind::Blur);
        assert_eq!(config.initial_state.intensity(), 35);
    }

    #[test]
    fn test_intensity_is_clamped_in_config() {
        let config = build_config(&parse(&["--intensity", "200"]));
        assert_eq!(config.initial_state.intensity(), MAX_INTENSITY);
        let config = build_config(&parse(&["--intensity", "1"]));
        assert_eq!(config.initial_state.intensity(), MIN_INTENSITY);
    }

    #[test]
    fn test_camera_without_output_warns_about_discarded_frames() {
        let hint = discard_hint(&parse(&["--screenshot-dir", "shots"])).unwrap();
        assert!(hint.contains("shots"));
        assert!(discard_hint(&parse(&["--output", "live.mp4"])).is_none());
        assert!(discard_hint(&parse(&[
            "--source", "video", "--input", "in.mp4", "--output", "out.mp4",
        ]))
        .is_none());
    }

    #[test]
    fn test_demo_selects_side_by_side() {
        let config = build_config(&parse(&["--demo", "--no-info"]));
        assert_eq!(config.layout, DisplayLayout::SideBySide { title_bar: true });
        assert!(!config.show_info);
    }

    #[test]
    fn test_video_requires_input_and_output() {
        assert!(validate(&parse(&["--source", "video"])).is_err());
        assert!(validate(&parse(&["--source", "video", "--input", "Cargo.toml"])).is_err());
    }

    #[test]
    fn test_camera_rejects_input() {
        assert!(validate(&parse(&["--input", "Cargo.toml"])).is_err());
    }

    #[test]
    fn test_image_output_needs_image_extension() {
        let cli = parse(&[
            "--source", "image", "--input", "Cargo.toml", "--output", "out.mp4",
        ]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_confidence_range() {
        assert!(validate(&parse(&["--confidence", "1.5"])).is_err());
    }

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("photo.JPG")));
        assert!(!is_image(Path::new("clip.mp4")));
        assert!(!is_image(Path::new("noext")));
    }
}
