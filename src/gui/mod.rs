mod app;
mod message;
mod worker;

pub use app::SpotterApp;
pub use message::{Message, RunEvent};

/// Launch the desktop front-end.
pub fn run() -> iced::Result {
    iced::application(SpotterApp::default, SpotterApp::update, SpotterApp::view)
        .title("Spotter — detections to CSV")
        .theme(|_state| iced::Theme::Dark)
        .run()
}
