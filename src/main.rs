use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use spotter::models::RunParams;
use spotter::sources::SourceError;
use spotter::{batch, detect};

#[derive(Parser)]
#[command(name = "spotter")]
#[command(about = "Object detection on images, with per-image summaries and CSV export")]
struct Cli {
    /// Path to an image file or a directory of images
    #[arg(long, value_name = "PATH")]
    source: PathBuf,

    /// ONNX detection model to use
    #[arg(long, default_value = "yolov8n.onnx")]
    model: String,

    /// Confidence threshold (0-1)
    #[arg(long, default_value = "0.25")]
    conf: f32,

    /// Output directory for predictions
    #[arg(long, value_name = "DIR", default_value = "runs/detect")]
    output: PathBuf,

    /// Device to run on ("cpu", "cuda"). Default: auto
    #[arg(long, default_value = "")]
    device: String,

    /// Optional CSV output path to write detections
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Cli::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<SourceError>() {
            Some(SourceError::NotFound(_)) => {
                eprintln!("{err}");
                ExitCode::from(2)
            }
            _ => {
                eprintln!("Error: {err:#}");
                ExitCode::from(1)
            }
        },
    }
}

fn run(args: Cli) -> anyhow::Result<()> {
    let params = RunParams {
        source: args.source,
        model: args.model,
        confidence: args.conf,
        device: args.device,
        output_dir: args.output,
        csv_path: args.csv,
        save_images: true,
    };

    // Check the source before paying for model loading, so a bad path
    // fails fast with the dedicated exit code.
    spotter::sources::list_images(&params.source)?;

    let mut detector = detect::default_backend(&params.model, params.confidence, &params.device)?;
    batch::run(&params, detector.as_mut(), &mut |line| println!("{line}"))?;
    Ok(())
}
