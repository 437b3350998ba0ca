//! The batch runner: the single entry point both front-ends call.
//!
//! Enumerates the source, runs the detector per image, aggregates, and
//! exports. All user-visible progress goes through the caller's log sink,
//! so the CLI prints to stdout while the GUI forwards lines to its pane;
//! the runner itself never touches a terminal or a widget.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use image::GenericImageView;

use crate::detect::Detector;
use crate::models::{Detection, RunParams};
use crate::{annotate, report, sources};

/// Run one detection batch to completion.
///
/// Returns the final status line (also emitted through `log`) so GUI
/// callers have a message to surface on completion. Every failure is
/// terminal: nothing is retried, and no image is silently skipped.
pub fn run(
    params: &RunParams,
    detector: &mut dyn Detector,
    log: &mut dyn FnMut(&str),
) -> Result<String> {
    let images = sources::list_images(&params.source)?;
    if images.is_empty() {
        let message = format!("No images found at: {}", params.source.display());
        log(&message);
        return Ok(message);
    }

    let total = images.len();
    log(&format!(
        "Running detection on {} image(s) using {}…",
        total, params.model
    ));
    let started = Instant::now();

    let mut records: Vec<Detection> = Vec::new();
    for path in &images {
        let image = image::open(path)
            .with_context(|| format!("failed to open image: {}", path.display()))?;
        let (width, height) = image.dimensions();

        let predictions = detector
            .detect(&image)
            .with_context(|| format!("detection failed on: {}", path.display()))?;

        let first_record = records.len();
        for p in predictions {
            records.push(Detection {
                image: path.display().to_string(),
                label: p.label,
                confidence: p.confidence,
                // Truncation toward zero, matching the engine tooling's
                // integer coercion of box coordinates.
                x_min: p.x_min as i64,
                y_min: p.y_min as i64,
                x_max: p.x_max as i64,
                y_max: p.y_max as i64,
                width,
                height,
            });
        }

        if params.save_images {
            let destination = prediction_dir(params).join(file_name(path));
            annotate::save_annotated(&image, &records[first_record..], &destination)?;
        }
    }

    let order: Vec<String> = images.iter().map(|path| file_name(path)).collect();
    for line in report::summarize(&records, &order) {
        log(&line);
    }

    if let Some(csv_path) = &params.csv_path {
        report::export(&records, csv_path)?;
        log(&format!("CSV saved to: {}", csv_path.display()));
    }

    let message = format!(
        "Done in {:.2}s. Outputs saved under: {}",
        started.elapsed().as_secs_f64(),
        prediction_dir(params).display()
    );
    log(&message);
    Ok(message)
}

fn prediction_dir(params: &RunParams) -> PathBuf {
    params.output_dir.join("pred")
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
