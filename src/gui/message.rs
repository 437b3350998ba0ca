use std::path::PathBuf;

/// Notifications sent by the worker thread back to the UI.
///
/// The worker never touches widget state; everything it has to say
/// arrives here, over the run channel.
#[derive(Debug, Clone)]
pub enum RunEvent {
    Log(String),
    Finished(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum Message {
    PickFile,
    PickFolder,
    SourcePicked(Option<PathBuf>),
    ModelChanged(String),
    ConfidenceChanged(String),
    DeviceChanged(String),
    SaveImagesToggled(bool),
    PickCsv,
    CsvPicked(Option<PathBuf>),
    Run,
    Worker(RunEvent),
}
