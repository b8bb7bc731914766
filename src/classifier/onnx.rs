//! Hosted-model classifier backed by a pretrained ONNX network.
//!
//! The model and its id-to-label table are loaded exactly once, at
//! construction, and shared read-only across every request afterwards.
//! tract plans are inference-only, so no gradient state exists to disable.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tract_onnx::prelude::*;

use crate::classes;
use crate::classifier::{argmax, Classification, Classifier, ModelStatus};
use crate::config::OnnxConfig;
use crate::error::{Error, Result};
use crate::preprocess::{ImageInput, ImageNormalizer};

/// ImageNet normalization mean values (RGB)
const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet normalization std values (RGB)
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Classifier backed by a pretrained ONNX vision model.
pub struct OnnxClassifier {
    plan: OnnxPlan,
    labels: Vec<String>,
    normalizer: ImageNormalizer,
    /// Model input shape, NCHW with batch size 1
    input_shape: [usize; 4],
}

impl OnnxClassifier {
    /// Load the model and its label table.
    ///
    /// This is the expensive step; callers construct one classifier per
    /// process, not per request.
    pub fn load(config: &OnnxConfig) -> Result<Self> {
        let plan = tract_onnx::onnx()
            .model_for_path(&config.model_path)
            .map_err(|e| {
                Error::Model(format!(
                    "failed to read ONNX model {}: {e}",
                    config.model_path.display()
                ))
            })?
            .into_optimized()
            .map_err(|e| Error::Model(format!("failed to optimize model: {e}")))?
            .into_runnable()
            .map_err(|e| Error::Model(format!("model is not runnable: {e}")))?;

        let input_shape = probe_input_shape(&plan, config.image_size)?;

        let labels = match &config.labels_path {
            Some(path) => load_labels(path)?,
            None => classes::CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
        };

        let normalizer = ImageNormalizer::with_size(input_shape[3] as u32);

        Ok(Self {
            plan,
            labels,
            normalizer,
            input_shape,
        })
    }

    /// Scale a [0,1] CHW tensor with ImageNet statistics and wrap it in a
    /// batched NCHW tract tensor.
    fn to_input_tensor(&self, chw: Vec<f32>) -> Result<Tensor> {
        let [_, channels, height, width] = self.input_shape;
        let num_pixels = height * width;

        let mut data = chw;
        if data.len() != channels * num_pixels {
            return Err(Error::Inference(format!(
                "normalized tensor has {} values, model expects {}",
                data.len(),
                channels * num_pixels
            )));
        }

        for c in 0..channels {
            let (mean, std) = (IMAGENET_MEAN[c], IMAGENET_STD[c]);
            for value in &mut data[c * num_pixels..(c + 1) * num_pixels] {
                *value = (*value - mean) / std;
            }
        }

        Tensor::from_shape(&self.input_shape, &data)
            .map_err(|e| Error::Inference(format!("failed to build input tensor: {e}")))
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, input: ImageInput<'_>) -> Result<Classification> {
        let normalized = self.normalizer.normalize_input(input)?;
        let tensor = self.to_input_tensor(normalized.to_chw())?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| Error::Inference(format!("model run failed: {e}")))?;

        let logits: Vec<f32> = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| Error::Inference(format!("unexpected output tensor: {e}")))?
            .iter()
            .copied()
            .collect();

        if logits.is_empty() {
            return Err(Error::Inference("model produced no logits".to_string()));
        }

        let probabilities = softmax(&logits);
        let (index, probability) = argmax(&probabilities);

        let label = self
            .labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Classification {
            label,
            confidence: round_confidence(probability),
        })
    }

    fn status(&self) -> ModelStatus {
        ModelStatus::Loaded
    }
}

/// Read the model's declared input shape, or fall back to a square NCHW
/// shape when the model leaves it dynamic.
fn probe_input_shape(plan: &OnnxPlan, fallback_size: u32) -> Result<[usize; 4]> {
    let fact = plan
        .model()
        .input_fact(0)
        .map_err(|e| Error::Model(format!("failed to read model input: {e}")))?;

    let shape: Vec<usize> = fact
        .shape
        .as_concrete()
        .map(|s| s.to_vec())
        .unwrap_or_else(|| vec![1, 3, fallback_size as usize, fallback_size as usize]);

    if shape.len() != 4 || shape[0] != 1 || shape[1] != 3 {
        return Err(Error::Model(format!(
            "unsupported model input shape {shape:?}, expected [1, 3, H, W]"
        )));
    }

    Ok([shape[0], shape[1], shape[2], shape[3]])
}

/// Load an id-to-label table from JSON.
///
/// Accepts either a plain array (`["Apple_scab", ...]`) or an object keyed
/// by stringified class index (`{"0": "Apple_scab", ...}`), which is how
/// exported model configs usually ship their `id2label` table.
fn load_labels(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Model(format!("failed to read label table {}: {e}", path.display())))?;

    let value: Value = serde_json::from_str(&content)?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Error::Model("label table entries must be strings".to_string()))
            })
            .collect(),
        Value::Object(map) => {
            let mut labels = vec![String::new(); map.len()];
            for (key, item) in map {
                let index: usize = key
                    .parse()
                    .map_err(|_| Error::Model(format!("non-numeric label id {key:?}")))?;
                let label = item
                    .as_str()
                    .ok_or_else(|| Error::Model("label table entries must be strings".to_string()))?;

                if index >= labels.len() {
                    return Err(Error::Model(format!(
                        "label id {index} out of range for table of {} entries",
                        labels.len()
                    )));
                }
                labels[index] = label.to_string();
            }
            Ok(labels)
        }
        _ => Err(Error::Model(
            "label table must be a JSON array or object".to_string(),
        )),
    }
}

/// Softmax over raw logits, stabilized by max subtraction.
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Round a probability to 4 decimal places for the response payload.
fn round_confidence(probability: f32) -> f32 {
    (probability * 10_000.0).round() / 10_000.0
}
