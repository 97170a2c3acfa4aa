#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tract_onnx::prelude::*;

use crate::detect::model::{NoiseClassifier, SequenceDetector};
use crate::detect::result::DetectionBox;
use crate::frame::Frame;

type RunnableOnnx = SimplePlan<TypedFact, Box<dyn TypedOp>>;

fn load_model<P: AsRef<Path>>(model_path: P, input_shape: [usize; 4]) -> Result<RunnableOnnx> {
    let model_path = model_path.as_ref();
    tract_onnx::onnx()
        .model_for_path(model_path)
        .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
        .with_input_fact(
            0,
            InferenceFact::dt_shape(
                f32::datum_type(),
                tvec!(input_shape[0], input_shape[1], input_shape[2], input_shape[3]),
            ),
        )
        .context("failed to set input fact")?
        .into_optimized()
        .context("failed to optimize ONNX model")?
        .into_runnable()
        .context("failed to build runnable ONNX model")
}

fn check_dims(crop: &Frame, width: u32, height: u32) -> Result<()> {
    if crop.width() != width || crop.height() != height {
        return Err(anyhow!(
            "crop size {}x{} does not match model input {}x{}",
            crop.width(),
            crop.height(),
            width,
            height
        ));
    }
    Ok(())
}

/// Tract-backed noise classifier.
///
/// Feeds the crop as a single grayscale channel scaled to 0..1 and reads the
/// argmax of the first output: index 0 is the noise class.
pub struct TractNoiseClassifier {
    model: RunnableOnnx,
    input_size: u32,
}

impl TractNoiseClassifier {
    /// Load an ONNX classifier expecting `input_size` x `input_size` crops.
    pub fn new<P: AsRef<Path>>(model_path: P, input_size: u32) -> Result<Self> {
        let side = input_size as usize;
        let model = load_model(model_path, [1, 1, side, side])?;
        Ok(Self { model, input_size })
    }

    fn build_input(&self, crop: &Frame) -> Result<Tensor> {
        check_dims(crop, self.input_size, self.input_size)?;

        let side = self.input_size as usize;
        let pixels = crop.pixels();
        let input = tract_ndarray::Array4::from_shape_fn((1, 1, side, side), |(_, _, y, x)| {
            let idx = (y * side + x) * 3;
            let r = pixels[idx] as f32;
            let g = pixels[idx + 1] as f32;
            let b = pixels[idx + 2] as f32;
            (0.299 * r + 0.587 * g + 0.114 * b) / 255.0
        });
        Ok(input.into_tensor())
    }
}

impl NoiseClassifier for TractNoiseClassifier {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn predict(&mut self, crop: &Frame) -> Result<bool> {
        let input = self.build_input(crop)?;
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("classifier inference failed")?;
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("classifier produced no outputs"))?;
        let scores = output
            .to_array_view::<f32>()
            .context("classifier output tensor was not f32")?;

        let mut best_index = 0usize;
        let mut best_score = f32::NEG_INFINITY;
        for (index, &score) in scores.iter().enumerate() {
            if score > best_score {
                best_index = index;
                best_score = score;
            }
        }
        Ok(best_index == 0)
    }
}

/// Tract-backed digit detector.
///
/// Expects a post-NMS detection head emitting rows of
/// `[x1, y1, x2, y2, confidence, class]`. Rows below the confidence
/// threshold are dropped; an empty survivor set reports nothing usable.
pub struct TractSequenceDetector {
    model: RunnableOnnx,
    width: u32,
    height: u32,
    confidence_threshold: f32,
}

impl TractSequenceDetector {
    /// Load an ONNX detector expecting `width` x `height` RGB crops.
    pub fn new<P: AsRef<Path>>(model_path: P, width: u32, height: u32) -> Result<Self> {
        let model = load_model(model_path, [1, 3, height as usize, width as usize])?;
        Ok(Self {
            model,
            width,
            height,
            confidence_threshold: 0.5,
        })
    }

    /// Override the default confidence threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    fn build_input(&self, crop: &Frame) -> Result<Tensor> {
        check_dims(crop, self.width, self.height)?;

        let width = self.width as usize;
        let height = self.height as usize;
        let pixels = crop.pixels();
        let input = tract_ndarray::Array4::from_shape_fn(
            (1, 3, height, width),
            |(_, channel, y, x)| {
                let idx = (y * width + x) * 3 + channel;
                pixels[idx] as f32 / 255.0
            },
        );
        Ok(input.into_tensor())
    }
}

impl SequenceDetector for TractSequenceDetector {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn predict(&mut self, crop: &Frame) -> Result<Option<Vec<DetectionBox>>> {
        let input = self.build_input(crop)?;
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("detector inference failed")?;
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("detector produced no outputs"))?;
        let rows: Vec<f32> = output
            .to_array_view::<f32>()
            .context("detector output tensor was not f32")?
            .iter()
            .cloned()
            .collect();

        let mut boxes = Vec::new();
        for row in rows.chunks_exact(6) {
            let confidence = row[4];
            if confidence < self.confidence_threshold {
                continue;
            }
            let class = row[5].round();
            if class < 0.0 {
                continue;
            }
            boxes.push(DetectionBox {
                x1: row[0],
                y1: row[1],
                x2: row[2],
                y2: row[3],
                confidence,
                class_id: class as u32,
            });
        }

        if boxes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(boxes))
        }
    }
}
