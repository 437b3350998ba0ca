//! Annotated image output: draw detection boxes on a copy of the source
//! image and save it under the run's prediction directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, Rgb};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Save a copy of `image` with one hollow rectangle per detection.
///
/// Boxes are clamped to the image bounds; degenerate (zero-area) boxes
/// are skipped rather than drawn as stray lines.
pub fn save_annotated(
    image: &DynamicImage,
    detections: &[crate::models::Detection],
    destination: &Path,
) -> Result<()> {
    let mut canvas = image.to_rgb8();
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);

    for det in detections {
        let x1 = det.x_min.clamp(0, width - 1);
        let y1 = det.y_min.clamp(0, height - 1);
        let x2 = det.x_max.clamp(0, width);
        let y2 = det.y_max.clamp(0, height);
        if x2 <= x1 || y2 <= y1 {
            continue;
        }
        let rect = Rect::at(x1 as i32, y1 as i32).of_size((x2 - x1) as u32, (y2 - y1) as u32);
        draw_hollow_rect_mut(&mut canvas, rect, BOX_COLOR);
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
    }
    canvas
        .save(destination)
        .with_context(|| format!("failed to save annotated image: {}", destination.display()))?;
    Ok(())
}
