//! Tests for detection aggregation and CSV export.
//!
//! Tests cover:
//! - One CSV row per input record, in input order
//! - Best-confidence-per-label summaries with alphabetical label order
//! - Explicit marker lines for images without detections
//! - Header-only export for an empty batch
//! - Deterministic, byte-identical re-export

mod common;

use std::fs;

use common::*;
use spotter::report::{CSV_COLUMNS, NO_OBJECTS_MARKER};
use spotter::{export, summarize};

fn order(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_export_writes_one_row_per_record_in_input_order() -> anyhow::Result<()> {
    let records = vec![
        make_detection("a.jpg", "cat", 0.9, (1, 2, 3, 4), (100, 100)),
        make_detection("b.jpg", "dog", 0.5, (5, 6, 7, 8), (200, 100)),
        make_detection("a.jpg", "cat", 0.4, (9, 10, 11, 12), (100, 100)),
    ];

    let dir = tempfile::TempDir::new()?;
    let csv_path = dir.path().join("detections.csv");
    export(&records, &csv_path)?;

    let contents = fs::read_to_string(&csv_path)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 4, "header plus one row per record");
    assert_eq!(lines[0], CSV_COLUMNS.join(","));
    assert!(lines[1].starts_with("a.jpg,cat,"));
    assert!(lines[2].starts_with("b.jpg,dog,"));
    assert!(lines[3].starts_with("a.jpg,cat,"));
    Ok(())
}

#[test]
fn test_export_row_fields_match_record() -> anyhow::Result<()> {
    let records = vec![make_detection(
        "photos/cat.png",
        "cat",
        0.83,
        (10, 10, 50, 90),
        (100, 100),
    )];

    let dir = tempfile::TempDir::new()?;
    let csv_path = dir.path().join("detections.csv");
    export(&records, &csv_path)?;

    let contents = fs::read_to_string(&csv_path)?;
    let row: Vec<&str> = contents.lines().nth(1).expect("data row").split(',').collect();
    assert_eq!(
        row,
        vec!["photos/cat.png", "cat", "0.83", "10", "10", "50", "90", "100", "100"]
    );
    Ok(())
}

#[test]
fn test_export_empty_batch_produces_header_only() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let csv_path = dir.path().join("detections.csv");
    export(&[], &csv_path)?;

    let contents = fs::read_to_string(&csv_path)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec![CSV_COLUMNS.join(",").as_str()]);
    Ok(())
}

#[test]
fn test_export_creates_missing_parent_directory() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let csv_path = dir.path().join("deep/nested/out.csv");
    export(&[], &csv_path)?;
    assert!(csv_path.is_file());
    Ok(())
}

#[test]
fn test_export_is_deterministic_across_destinations() -> anyhow::Result<()> {
    let records = vec![
        make_detection("a.jpg", "person", 0.83, (10, 10, 50, 90), (100, 100)),
        make_detection("a.jpg", "person", 0.4, (60, 20, 90, 95), (100, 100)),
    ];

    let dir = tempfile::TempDir::new()?;
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    export(&records, &first)?;
    export(&records, &second)?;

    assert_eq!(fs::read(&first)?, fs::read(&second)?);
    Ok(())
}

#[test]
fn test_export_surfaces_io_failure() {
    let dir = tempfile::TempDir::new().unwrap();
    // A destination whose "parent directory" is a regular file.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"not a directory").unwrap();
    let csv_path = blocker.join("out.csv");

    let result = export(&[], &csv_path);
    assert!(result.is_err());
}

#[test]
fn test_summarize_keeps_max_confidence_per_label_sorted_by_name() {
    let records = vec![
        make_detection("img1.jpg", "dog", 0.40, (0, 0, 1, 1), (10, 10)),
        make_detection("img1.jpg", "cat", 0.62, (0, 0, 1, 1), (10, 10)),
        make_detection("img1.jpg", "cat", 0.91, (0, 0, 1, 1), (10, 10)),
    ];

    let lines = summarize(&records, &order(&["img1.jpg"]));
    assert_eq!(lines[0], "[1/1] img1.jpg");
    assert_eq!(lines[1], "  → cat (0.91), dog (0.40)");
}

#[test]
fn test_summarize_never_invents_labels() {
    let records = vec![make_detection("img1.jpg", "cat", 0.9, (0, 0, 1, 1), (10, 10))];

    let lines = summarize(&records, &order(&["img1.jpg", "img2.jpg"]));
    let all = lines.join("\n");
    assert_eq!(all.matches("cat").count(), 1, "cat only under img1.jpg");
    assert!(lines[3].contains(NO_OBJECTS_MARKER));
}

#[test]
fn test_summarize_reports_empty_images_in_traversal_order() {
    let lines = summarize(&[], &order(&["z.jpg", "a.jpg"]));
    assert_eq!(
        lines,
        vec![
            "[1/2] z.jpg".to_string(),
            format!("  → {NO_OBJECTS_MARKER}"),
            "[2/2] a.jpg".to_string(),
            format!("  → {NO_OBJECTS_MARKER}"),
        ],
        "order comes from the traversal, not from the records"
    );
}

#[test]
fn test_summarize_groups_records_by_file_name() {
    // Records carry full paths; summaries are keyed by file name.
    let records = vec![make_detection(
        "photos/nested/img1.jpg",
        "cat",
        0.5,
        (0, 0, 1, 1),
        (10, 10),
    )];

    let lines = summarize(&records, &order(&["img1.jpg"]));
    assert_eq!(lines[1], "  → cat (0.50)");
}

#[test]
fn test_end_to_end_scenario_from_two_person_detections() -> anyhow::Result<()> {
    // Two detections of the same label in one image: collapsed in the
    // summary, preserved in the export.
    let records = vec![
        make_detection("a.jpg", "person", 0.83, (10, 10, 50, 90), (100, 100)),
        make_detection("a.jpg", "person", 0.40, (60, 20, 90, 95), (100, 100)),
    ];

    let lines = summarize(&records, &order(&["a.jpg", "b.jpg"]));
    assert_eq!(lines[0], "[1/2] a.jpg");
    assert_eq!(lines[1], "  → person (0.83)");
    assert_eq!(lines[2], "[2/2] b.jpg");
    assert_eq!(lines[3], format!("  → {NO_OBJECTS_MARKER}"));

    let dir = tempfile::TempDir::new()?;
    let csv_path = dir.path().join("detections.csv");
    export(&records, &csv_path)?;

    let contents = std::fs::read_to_string(&csv_path)?;
    let rows: Vec<Vec<&str>> = contents
        .lines()
        .skip(1)
        .map(|line| line.split(',').collect())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1], "person");
    assert_eq!(rows[1][1], "person");
    assert_eq!(rows[0][2].parse::<f32>()?, 0.83);
    assert_eq!(rows[1][2].parse::<f32>()?, 0.40);
    Ok(())
}
