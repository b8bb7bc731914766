//! Classifier adapters.
//!
//! Both model variants sit behind the [`Classifier`] trait: given a
//! submitted image they return a label from their own vocabulary and a
//! probability. Which variant runs is decided once, at construction, from
//! configuration. If the hosted model cannot be loaded, the process falls
//! back to the mock variant for its remaining lifetime.

pub mod mock;
pub mod onnx;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::preprocess::ImageInput;

pub use mock::MockClassifier;
pub use onnx::OnnxClassifier;

/// Raw classifier output: a vocabulary label and its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Label text from the model's vocabulary, not yet mapped to domain
    /// terms
    pub label: String,
    /// Probability of the predicted class, in [0,1]
    pub confidence: f32,
}

impl Classification {
    /// The well-formed stand-in returned when inference could not run
    pub fn degraded() -> Self {
        Self {
            label: "Error".to_string(),
            confidence: 0.0,
        }
    }
}

/// Whether a real pretrained model answered, or the mock stand-in.
///
/// Mock output must never be mistaken for a genuine diagnostic claim, so
/// the distinction is visible at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    /// A pretrained model is loaded and serving predictions
    Loaded,
    /// The mock classifier is serving placeholder predictions
    Mock,
}

impl ModelStatus {
    /// Boundary-layer status message
    pub fn message(&self) -> &'static str {
        match self {
            ModelStatus::Loaded => "Model Loaded Successfully",
            ModelStatus::Mock => "Using Mock Model",
        }
    }
}

impl std::fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Uniform prediction interface over the model variants.
///
/// Implementations hold only read-only state (plus the mock's RNG behind a
/// lock), so one instance serves concurrent requests.
pub trait Classifier: Send + Sync {
    /// Classify a submitted leaf image.
    ///
    /// On success the confidence is a probability in [0,1] and the label
    /// is non-empty. Decode and inference failures come back as typed
    /// errors; the orchestrator decides how to degrade them.
    fn predict(&self, input: ImageInput<'_>) -> Result<Classification>;

    /// Which kind of model is answering
    fn status(&self) -> ModelStatus;
}

/// Construct the configured classifier variant.
///
/// A hosted model that fails to load is not retried per request: the
/// failure is logged and the mock variant serves for the rest of the
/// process lifetime.
pub fn build_classifier(config: &ClassifierConfig) -> Box<dyn Classifier> {
    match config {
        ClassifierConfig::Onnx(onnx_config) => match OnnxClassifier::load(onnx_config) {
            Ok(classifier) => {
                info!(
                    model_path = %onnx_config.model_path.display(),
                    "loaded ONNX classifier"
                );
                Box::new(classifier)
            }
            Err(e) => {
                warn!(
                    model_path = %onnx_config.model_path.display(),
                    error = %e,
                    "failed to load ONNX model, falling back to mock classifier"
                );
                Box::new(MockClassifier::new())
            }
        },
        ClassifierConfig::Mock(mock_config) => Box::new(MockClassifier::from_config(mock_config)),
    }
}

/// Index and probability of the most likely class.
pub(crate) fn argmax(probabilities: &[f32]) -> (usize, f32) {
    probabilities
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, &p)| {
            if p > best.1 {
                (i, p)
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MockConfig, OnnxConfig};
    use std::path::PathBuf;

    #[test]
    fn test_degraded_classification() {
        let c = Classification::degraded();
        assert_eq!(c.label, "Error");
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(ModelStatus::Loaded.message(), "Model Loaded Successfully");
        assert_eq!(ModelStatus::Mock.message(), "Using Mock Model");
        assert_eq!(ModelStatus::Mock.to_string(), "Using Mock Model");
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), (1, 0.7));
        assert_eq!(argmax(&[0.5]), (0, 0.5));
        // Ties resolve to the earliest index
        assert_eq!(argmax(&[0.4, 0.4]).0, 0);
    }

    #[test]
    fn test_build_mock_classifier() {
        let classifier = build_classifier(&ClassifierConfig::Mock(MockConfig::default()));
        assert_eq!(classifier.status(), ModelStatus::Mock);
    }

    #[test]
    fn test_build_falls_back_to_mock() {
        let config = ClassifierConfig::Onnx(OnnxConfig {
            model_path: PathBuf::from("/nonexistent/model.onnx"),
            labels_path: None,
            image_size: 224,
        });

        let classifier = build_classifier(&config);
        assert_eq!(classifier.status(), ModelStatus::Mock);
    }
}
