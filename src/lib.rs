pub mod annotate;
pub mod batch;
pub mod detect;
pub mod models;
pub mod report;
pub mod sources;

pub use detect::{Detector, Prediction};
pub use models::{Detection, RunParams};
pub use report::{ExportError, export, summarize};
pub use sources::{SourceError, list_images};

#[cfg(feature = "gui")]
pub mod gui;
