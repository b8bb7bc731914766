//! Configuration structures for the diagnosis pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn default_onnx_image_size() -> u32 {
    224
}

fn default_mock_image_size() -> u32 {
    256
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosisConfig {
    /// Classifier selection and parameters
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl DiagnosisConfig {
    /// Load a configuration from a TOML file
    pub fn from_toml(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config {}: {e}", path.display())))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config {}: {e}", path.display())))
    }
}

/// Which classifier variant to construct.
///
/// The choice is explicit deployment configuration; nothing is inferred at
/// runtime from what happens to be importable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierConfig {
    /// Pretrained ONNX model on disk
    Onnx(OnnxConfig),
    /// Mock classifier over the built-in vocabulary
    Mock(MockConfig),
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig::Mock(MockConfig::default())
    }
}

/// Hosted-model classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnnxConfig {
    /// Path to the ONNX model file
    pub model_path: PathBuf,
    /// Path to the model's id-to-label table (JSON array, or object keyed
    /// by stringified class index). Falls back to the built-in vocabulary
    /// when absent.
    pub labels_path: Option<PathBuf>,
    /// Input side length used when the model declares a dynamic shape
    #[serde(default = "default_onnx_image_size")]
    pub image_size: u32,
}

/// Mock classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Seed for the probability generator. `None` seeds from OS entropy;
    /// set it to make the per-call sequence reproducible.
    pub seed: Option<u64>,
    /// Preprocessing side length
    #[serde(default = "default_mock_image_size")]
    pub image_size: u32,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            seed: None,
            image_size: default_mock_image_size(),
        }
    }
}
