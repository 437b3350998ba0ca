use std::path::PathBuf;

use iced::futures::channel::mpsc;
use iced::widget::{button, checkbox, column, container, row, scrollable, text, text_input};
use iced::{Element, Length, Task};
use rfd::AsyncFileDialog;

use crate::models::RunParams;
use crate::sources::IMAGE_EXTENSIONS;

use super::message::{Message, RunEvent};
use super::worker;

/// UI state for the desktop front-end.
///
/// Parameter fields are plain strings while being edited; they are
/// validated once, when a run starts, into an immutable [`RunParams`].
pub struct SpotterApp {
    source: Option<PathBuf>,
    model: String,
    confidence: String,
    device: String,
    save_images: bool,
    csv_path: Option<PathBuf>,
    output_dir: PathBuf,
    log: Vec<String>,
    running: bool,
}

impl Default for SpotterApp {
    fn default() -> Self {
        Self {
            source: None,
            model: "yolov8n.onnx".to_string(),
            confidence: "0.25".to_string(),
            device: String::new(),
            save_images: false,
            csv_path: None,
            output_dir: PathBuf::from("runs/detect"),
            log: Vec::new(),
            running: false,
        }
    }
}

impl SpotterApp {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFile => Task::perform(
                async {
                    AsyncFileDialog::new()
                        .set_title("Select image file")
                        .add_filter("Images", &IMAGE_EXTENSIONS)
                        .pick_file()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::SourcePicked,
            ),
            Message::PickFolder => Task::perform(
                async {
                    AsyncFileDialog::new()
                        .set_title("Select images folder")
                        .pick_folder()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::SourcePicked,
            ),
            Message::SourcePicked(path) => {
                if path.is_some() {
                    self.source = path;
                }
                Task::none()
            }
            Message::ModelChanged(value) => {
                self.model = value;
                Task::none()
            }
            Message::ConfidenceChanged(value) => {
                self.confidence = value;
                Task::none()
            }
            Message::DeviceChanged(value) => {
                self.device = value;
                Task::none()
            }
            Message::SaveImagesToggled(value) => {
                self.save_images = value;
                Task::none()
            }
            Message::PickCsv => Task::perform(
                async {
                    AsyncFileDialog::new()
                        .set_title("Save detections CSV")
                        .add_filter("CSV files", &["csv"])
                        .save_file()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::CsvPicked,
            ),
            Message::CsvPicked(path) => {
                if path.is_some() {
                    self.csv_path = path;
                }
                Task::none()
            }
            Message::Run => self.start_run(),
            Message::Worker(event) => {
                match event {
                    RunEvent::Log(line) => self.log.push(line),
                    RunEvent::Finished(message) => {
                        self.log.push(format!("Completed: {message}"));
                        self.running = false;
                    }
                    RunEvent::Failed(message) => {
                        self.log.push(format!("Error: {message}"));
                        self.running = false;
                    }
                }
                Task::none()
            }
        }
    }

    fn start_run(&mut self) -> Task<Message> {
        let Some(source) = self.source.clone() else {
            self.log
                .push("Please select a file or folder of images".to_string());
            return Task::none();
        };
        let Ok(confidence) = self.confidence.trim().parse::<f32>() else {
            self.log
                .push("Confidence must be a number between 0 and 1".to_string());
            return Task::none();
        };

        let model = self.model.trim();
        let params = RunParams {
            source,
            model: if model.is_empty() {
                "yolov8n.onnx".to_string()
            } else {
                model.to_string()
            },
            confidence,
            device: self.device.trim().to_string(),
            output_dir: self.output_dir.clone(),
            // The GUI always exports; default next to the other outputs.
            csv_path: Some(
                self.csv_path
                    .clone()
                    .unwrap_or_else(|| self.output_dir.join("detections.csv")),
            ),
            save_images: self.save_images,
        };

        self.running = true;
        self.log.clear();

        let (sender, receiver) = mpsc::unbounded();
        std::thread::spawn(move || worker::run(params, sender));
        Task::run(receiver, Message::Worker)
    }

    pub fn view(&self) -> Element<'_, Message> {
        let source_label = self
            .source
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "No source selected".to_string());
        let source_row = row![
            text(source_label).width(Length::Fill),
            button("Select File").on_press(Message::PickFile),
            button("Select Folder").on_press(Message::PickFolder),
        ]
        .spacing(8);

        let params_row = row![
            text("Model"),
            text_input("yolov8n.onnx", &self.model)
                .on_input(Message::ModelChanged)
                .width(Length::Fixed(200.0)),
            text("Confidence"),
            text_input("0.25", &self.confidence)
                .on_input(Message::ConfidenceChanged)
                .width(Length::Fixed(80.0)),
            text("Device"),
            text_input("auto", &self.device)
                .on_input(Message::DeviceChanged)
                .width(Length::Fixed(80.0)),
        ]
        .spacing(8);

        let csv_label = self
            .csv_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "No CSV path selected".to_string());
        let outputs_row = row![
            checkbox("Save annotated images", self.save_images)
                .on_toggle(Message::SaveImagesToggled),
            button("Choose CSV Path").on_press(Message::PickCsv),
            text(csv_label).width(Length::Fill),
        ]
        .spacing(8);

        let run_button = button(if self.running {
            "Running…"
        } else {
            "Run Detection"
        })
        .on_press_maybe((!self.running).then_some(Message::Run));

        let log_pane = scrollable(text(self.log.join("\n")).size(13))
            .anchor_bottom()
            .width(Length::Fill)
            .height(Length::Fill);

        let content = column![source_row, params_row, outputs_row, run_button, log_pane]
            .spacing(12)
            .padding(16);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}
