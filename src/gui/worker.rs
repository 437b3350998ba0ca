use iced::futures::channel::mpsc::UnboundedSender;

use crate::models::RunParams;
use crate::{batch, detect};

use super::message::RunEvent;

/// Run one detection batch on a worker thread, reporting progress,
/// completion, and errors over `sender`.
///
/// Send failures are ignored on purpose: they only happen when the UI
/// side has dropped the receiver, at which point nobody is listening.
pub fn run(params: RunParams, sender: UnboundedSender<RunEvent>) {
    let log_sender = sender.clone();
    let mut log = move |line: &str| {
        let _ = log_sender.unbounded_send(RunEvent::Log(line.to_string()));
    };

    let outcome = detect::default_backend(&params.model, params.confidence, &params.device)
        .and_then(|mut detector| batch::run(&params, detector.as_mut(), &mut log));

    let event = match outcome {
        Ok(message) => RunEvent::Finished(message),
        Err(err) => RunEvent::Failed(format!("{err:#}")),
    };
    let _ = sender.unbounded_send(event);
}
