use std::path::PathBuf;

use serde::Serialize;

/// One detected object instance within one image.
///
/// Field order matches the CSV column order, so serializing a record
/// yields exactly one well-formed data row.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    /// Path of the source image, as supplied to the run.
    pub image: String,
    /// Semantic class name assigned by the engine.
    pub label: String,
    /// Engine confidence. Passed through unchanged, never clamped.
    pub confidence: f32,
    pub x_min: i64,
    pub y_min: i64,
    pub x_max: i64,
    pub y_max: i64,
    /// Original image width in pixels, constant per image.
    pub width: u32,
    /// Original image height in pixels, constant per image.
    pub height: u32,
}

impl Detection {
    /// File name component of `image`, used as the per-image grouping key
    /// in summaries. Falls back to the full path if there is no file name.
    pub fn image_name(&self) -> String {
        PathBuf::from(&self.image)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.image.clone())
    }
}

/// All inputs of one batch run, fixed before the run starts.
///
/// Both front-ends build one of these and hand it to [`crate::batch::run`];
/// nothing is mutated while the run is in flight.
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Image file or directory of images.
    pub source: PathBuf,
    /// ONNX model file for the inference backend.
    pub model: String,
    /// Confidence threshold (0.0 - 1.0).
    pub confidence: f32,
    /// Device selector: empty for auto, "cpu", or "cuda".
    pub device: String,
    /// Directory for annotated output images.
    pub output_dir: PathBuf,
    /// Optional CSV destination; no export when absent.
    pub csv_path: Option<PathBuf>,
    /// Save annotated copies of the processed images.
    pub save_images: bool,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            model: "yolov8n.onnx".to_string(),
            confidence: 0.25,
            device: String::new(),
            output_dir: PathBuf::from("runs/detect"),
            csv_path: None,
            save_images: false,
        }
    }
}
