//! ONNX Runtime backend for YOLOv8-layout detection models.

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use ort::execution_providers::{
    CPUExecutionProvider, CUDAExecutionProvider, ExecutionProviderDispatch,
};
use ort::session::Session;
use ort::value::Tensor;

use super::{Detector, Prediction};

/// Square input size expected by the stock YOLOv8 exports.
const INPUT_SIZE: u32 = 640;
/// IoU threshold for non-maximum suppression.
const IOU_THRESHOLD: f32 = 0.45;

/// COCO class vocabulary, indexed by class id. Class ids outside this
/// table fall back to the numeric id, mirroring how the engine's own
/// tooling labels unknown classes.
const COCO_LABELS: [&str; 80] = [
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "airplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
    "fire hydrant",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
    "backpack",
    "umbrella",
    "handbag",
    "tie",
    "suitcase",
    "frisbee",
    "skis",
    "snowboard",
    "sports ball",
    "kite",
    "baseball bat",
    "baseball glove",
    "skateboard",
    "surfboard",
    "tennis racket",
    "bottle",
    "wine glass",
    "cup",
    "fork",
    "knife",
    "spoon",
    "bowl",
    "banana",
    "apple",
    "sandwich",
    "orange",
    "broccoli",
    "carrot",
    "hot dog",
    "pizza",
    "donut",
    "cake",
    "chair",
    "couch",
    "potted plant",
    "bed",
    "dining table",
    "toilet",
    "tv",
    "laptop",
    "mouse",
    "remote",
    "keyboard",
    "cell phone",
    "microwave",
    "oven",
    "toaster",
    "sink",
    "refrigerator",
    "book",
    "clock",
    "vase",
    "scissors",
    "teddy bear",
    "hair drier",
    "toothbrush",
];

/// Candidate box in original-image pixel space, before NMS.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    class_id: usize,
    confidence: f32,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl Candidate {
    fn iou(&self, other: &Candidate) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        let area_a = (self.x2 - self.x1) * (self.y2 - self.y1);
        let area_b = (other.x2 - other.x1) * (other.y2 - other.y1);
        inter / (area_a + area_b - inter)
    }
}

/// Wraps an ONNX Runtime session running a YOLOv8-layout model.
pub struct YoloDetector {
    session: Session,
    confidence: f32,
}

impl YoloDetector {
    /// Load an ONNX model from `model_path`.
    ///
    /// `device` selects the execution provider: "cuda" (or a bare GPU
    /// index) requests CUDA with CPU fallback, anything else runs on CPU.
    pub fn load(model_path: &str, confidence: f32, device: &str) -> Result<Self> {
        let session = Session::builder()
            .context("failed to create ONNX Runtime session builder")?
            .with_execution_providers(execution_providers(device))
            .context("failed to register execution providers")?
            .commit_from_file(model_path)
            .with_context(|| format!("failed to load model: {model_path}"))?;
        Ok(Self {
            session,
            confidence,
        })
    }
}

fn execution_providers(device: &str) -> Vec<ExecutionProviderDispatch> {
    let wants_gpu = device.starts_with("cuda") || device.parse::<u32>().is_ok();
    if wants_gpu {
        // CUDA first, CPU as fallback when the provider is unavailable.
        vec![
            CUDAExecutionProvider::default().build(),
            CPUExecutionProvider::default().build(),
        ]
    } else {
        vec![CPUExecutionProvider::default().build()]
    }
}

impl Detector for YoloDetector {
    fn detect(&mut self, image: &DynamicImage) -> Result<Vec<Prediction>> {
        let (orig_width, orig_height) = image.dimensions();
        let tensor = preprocess(image)?;

        // Stock YOLOv8 exports name their tensors "images" / "output0".
        let outputs = self
            .session
            .run(ort::inputs!["images" => tensor])
            .context("inference failed")?;
        let (shape, data) = outputs["output0"]
            .try_extract_tensor::<f32>()
            .context("failed to extract output tensor")?;

        // Output layout: [1, 4 + classes, anchors], column-major across
        // the attribute rows.
        let attributes = shape[1] as usize;
        let anchors = shape[2] as usize;
        let classes = attributes.saturating_sub(4);

        let scale_x = orig_width as f32 / INPUT_SIZE as f32;
        let scale_y = orig_height as f32 / INPUT_SIZE as f32;

        let mut candidates = Vec::new();
        for i in 0..anchors {
            let mut class_id = 0usize;
            let mut score = f32::MIN;
            for c in 0..classes {
                let s = data[(4 + c) * anchors + i];
                if s > score {
                    score = s;
                    class_id = c;
                }
            }
            if score < self.confidence {
                continue;
            }

            let cx = data[i];
            let cy = data[anchors + i];
            let w = data[2 * anchors + i];
            let h = data[3 * anchors + i];

            candidates.push(Candidate {
                class_id,
                confidence: score,
                x1: ((cx - w / 2.0) * scale_x).max(0.0),
                y1: ((cy - h / 2.0) * scale_y).max(0.0),
                x2: ((cx + w / 2.0) * scale_x).min(orig_width as f32),
                y2: ((cy + h / 2.0) * scale_y).min(orig_height as f32),
            });
        }

        let kept = nms(candidates, IOU_THRESHOLD);
        Ok(kept
            .into_iter()
            .map(|c| Prediction {
                label: COCO_LABELS
                    .get(c.class_id)
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| c.class_id.to_string()),
                confidence: c.confidence,
                x_min: c.x1,
                y_min: c.y1,
                x_max: c.x2,
                y_max: c.y2,
            })
            .collect())
    }
}

/// Resize to the model's square input and pack an NCHW float tensor
/// normalized to [0, 1].
fn preprocess(image: &DynamicImage) -> Result<Tensor<f32>> {
    let resized = image::imageops::resize(
        &image.to_rgb8(),
        INPUT_SIZE,
        INPUT_SIZE,
        FilterType::Triangle,
    );

    let plane = (INPUT_SIZE * INPUT_SIZE) as usize;
    let mut tensor_data = vec![0f32; 3 * plane];
    for (idx, pixel) in resized.pixels().enumerate() {
        tensor_data[idx] = pixel[0] as f32 / 255.0;
        tensor_data[plane + idx] = pixel[1] as f32 / 255.0;
        tensor_data[2 * plane + idx] = pixel[2] as f32 / 255.0;
    }

    let shape = [1usize, 3, INPUT_SIZE as usize, INPUT_SIZE as usize];
    Tensor::from_array((shape, tensor_data.into_boxed_slice()))
        .context("failed to build input tensor")
}

/// Class-aware non-maximum suppression: within each class, drop boxes
/// overlapping a higher-confidence box beyond the IoU threshold.
fn nms(mut boxes: Vec<Candidate>, iou_threshold: f32) -> Vec<Candidate> {
    boxes.sort_unstable_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Candidate> = Vec::new();
    let mut suppressed = vec![false; boxes.len()];
    for i in 0..boxes.len() {
        if suppressed[i] {
            continue;
        }
        kept.push(boxes[i]);
        for j in (i + 1)..boxes.len() {
            if boxes[j].class_id == boxes[i].class_id && boxes[i].iou(&boxes[j]) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }
    kept
}
