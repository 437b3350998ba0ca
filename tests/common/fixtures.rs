use std::collections::VecDeque;
use std::path::Path;

use image::{DynamicImage, ImageBuffer, Rgb};
use spotter::{Detection, Detector, Prediction};

/// Saves a 100x100 red PNG at `path`.
pub fn write_test_image(path: &Path) {
    let img = ImageBuffer::from_fn(100, 100, |_, _| Rgb([255u8, 0u8, 0u8]));
    img.save_with_format(path, image::ImageFormat::Png)
        .expect("Failed to save test image");
}

/// Builds a detection record without the ceremony.
pub fn make_detection(
    image: &str,
    label: &str,
    confidence: f32,
    bbox: (i64, i64, i64, i64),
    size: (u32, u32),
) -> Detection {
    Detection {
        image: image.to_string(),
        label: label.to_string(),
        confidence,
        x_min: bbox.0,
        y_min: bbox.1,
        x_max: bbox.2,
        y_max: bbox.3,
        width: size.0,
        height: size.1,
    }
}

/// A detector that replays canned predictions, one batch per image in
/// call order. Images beyond the canned list yield no detections.
pub struct StubDetector {
    responses: VecDeque<Vec<Prediction>>,
}

impl StubDetector {
    pub fn new(responses: Vec<Vec<Prediction>>) -> Self {
        Self {
            responses: responses.into(),
        }
    }
}

impl Detector for StubDetector {
    fn detect(&mut self, _image: &DynamicImage) -> anyhow::Result<Vec<Prediction>> {
        Ok(self.responses.pop_front().unwrap_or_default())
    }
}

/// Builds a prediction with float box coordinates.
pub fn make_prediction(
    label: &str,
    confidence: f32,
    bbox: (f32, f32, f32, f32),
) -> Prediction {
    Prediction {
        label: label.to_string(),
        confidence,
        x_min: bbox.0,
        y_min: bbox.1,
        x_max: bbox.2,
        y_max: bbox.3,
    }
}
