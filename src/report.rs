//! Detection aggregation and tabular export.
//!
//! Two views over the same batch of records, for two different consumers:
//! [`summarize`] collapses each image to its best confidence per label for
//! a human skimming a log, while [`export`] writes every raw detection so
//! downstream tooling keeps full fidelity. Summarization is a presentation
//! layer on top of the export, never a replacement for it.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::models::Detection;

/// CSV column set, in order. One data row per detection.
pub const CSV_COLUMNS: [&str; 9] = [
    "image",
    "label",
    "confidence",
    "x_min",
    "y_min",
    "x_max",
    "y_max",
    "width",
    "height",
];

/// Line emitted for an image that produced no detections.
pub const NO_OBJECTS_MARKER: &str = "No objects detected above threshold";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error writing CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Build per-image display lines from an unordered batch of detections.
///
/// `image_order` is the traversal order of the run and may name images
/// with zero records; those still get a line, marked explicitly. Records
/// are grouped by image file name, and within an image each label keeps
/// the highest confidence seen. Labels are listed in ascending name order
/// with confidences formatted to two decimals.
pub fn summarize(records: &[Detection], image_order: &[String]) -> Vec<String> {
    let mut by_image: HashMap<String, BTreeMap<String, f32>> = HashMap::new();
    for record in records {
        let best = by_image.entry(record.image_name()).or_default();
        best.entry(record.label.clone())
            .and_modify(|score| {
                if record.confidence > *score {
                    *score = record.confidence;
                }
            })
            .or_insert(record.confidence);
    }

    let total = image_order.len();
    let mut lines = Vec::with_capacity(total * 2);
    for (idx, name) in image_order.iter().enumerate() {
        lines.push(format!("[{}/{}] {}", idx + 1, total, name));
        match by_image.get(name) {
            Some(best) if !best.is_empty() => {
                let summary = best
                    .iter()
                    .map(|(label, score)| format!("{label} ({score:.2})"))
                    .collect::<Vec<_>>()
                    .join(", ");
                lines.push(format!("  → {summary}"));
            }
            _ => lines.push(format!("  → {NO_OBJECTS_MARKER}")),
        }
    }
    lines
}

/// Write every detection to `csv_path`, one row per record in input order.
///
/// The parent directory is created if absent. An empty batch still yields
/// a well-formed file containing only the header row. Failures surface to
/// the caller unchanged; a failure partway through may leave a truncated
/// file behind.
pub fn export(records: &[Detection], csv_path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = csv_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // The header is written by hand so it is present even for an empty
    // batch; serialization of the records must therefore skip it.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(csv_path)?;
    writer.write_record(CSV_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
