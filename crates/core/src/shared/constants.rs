pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// Confidence threshold used by the live application.
pub const DEFAULT_CONFIDENCE: f64 = 0.4;

pub const MIN_INTENSITY: u8 = 5;
pub const MAX_INTENSITY: u8 = 50;
pub const DEFAULT_INTENSITY: u8 = 15;
/// Intensity change per increase/decrease key press.
pub const INTENSITY_STEP: u8 = 2;

/// Resolution requested from capture devices.
pub const CAMERA_WIDTH: u32 = 1280;
pub const CAMERA_HEIGHT: u32 = 720;

pub const DEFAULT_SCREENSHOT_DIR: &str = "output";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
