//! The boundary to the detection engine.
//!
//! Everything past [`Detector::detect`] is the engine's business: network
//! architecture, weights, device placement. The rest of the crate only
//! sees finished predictions in original-image pixel space.

#[cfg(feature = "yolo")]
pub mod yolo;

use image::DynamicImage;

/// A raw engine prediction for one object, in original-image pixel space.
///
/// Coordinates stay floating point here; truncation to integer pixels
/// happens when the batch runner builds [`crate::models::Detection`]
/// records.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

/// An object-detection engine.
pub trait Detector {
    /// Detect objects in a decoded image, returning predictions at or
    /// above the engine's configured confidence threshold.
    fn detect(&mut self, image: &DynamicImage) -> anyhow::Result<Vec<Prediction>>;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn detect(&mut self, image: &DynamicImage) -> anyhow::Result<Vec<Prediction>> {
        (**self).detect(image)
    }
}

/// Build the default inference backend for the given run settings.
#[cfg(feature = "yolo")]
pub fn default_backend(
    model: &str,
    confidence: f32,
    device: &str,
) -> anyhow::Result<Box<dyn Detector>> {
    let detector = yolo::YoloDetector::load(model, confidence, device)?;
    Ok(Box::new(detector))
}

#[cfg(not(feature = "yolo"))]
pub fn default_backend(
    _model: &str,
    _confidence: f32,
    _device: &str,
) -> anyhow::Result<Box<dyn Detector>> {
    anyhow::bail!("this build has no inference backend (enable the `yolo` feature)")
}
