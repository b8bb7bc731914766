//! Mock classifier for deployments without a usable pretrained model.
//!
//! Keeps the rest of the pipeline functional when weights are missing or
//! the network is unreachable. Its output is a pseudo-random probability
//! vector over the built-in vocabulary, never a genuine diagnostic claim,
//! which is why it reports [`ModelStatus::Mock`].

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::classes;
use crate::classifier::{argmax, Classification, Classifier, ModelStatus};
use crate::config::MockConfig;
use crate::error::Result;
use crate::preprocess::{ImageInput, ImageNormalizer};

/// Stand-in classifier over the built-in vocabulary.
pub struct MockClassifier {
    normalizer: ImageNormalizer,
    rng: Mutex<StdRng>,
}

impl MockClassifier {
    /// Mock classifier with entropy-seeded output
    pub fn new() -> Self {
        Self::from_config(&MockConfig::default())
    }

    /// Mock classifier with a deterministic per-call sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::from_config(&MockConfig {
            seed: Some(seed),
            ..MockConfig::default()
        })
    }

    /// Build from configuration
    pub fn from_config(config: &MockConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            normalizer: ImageNormalizer::with_size(config.image_size),
            rng: Mutex::new(rng),
        }
    }

    /// Draw a probability vector over all classes that sums to 1.
    fn probabilities(&self) -> Vec<f32> {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let raw: Vec<f32> = (0..classes::NUM_CLASSES)
            .map(|_| rng.gen::<f32>())
            .collect();
        let sum: f32 = raw.iter().sum();

        raw.into_iter().map(|p| p / sum).collect()
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for MockClassifier {
    fn predict(&self, input: ImageInput<'_>) -> Result<Classification> {
        // The tensor itself is unused, but unreadable images must still
        // fail here instead of producing a made-up prediction.
        let _normalized = self.normalizer.normalize_input(input)?;

        let probabilities = self.probabilities();
        let (index, probability) = argmax(&probabilities);

        let label = classes::class_name(index).unwrap_or("Unknown").to_string();

        Ok(Classification {
            label,
            confidence: probability,
        })
    }

    fn status(&self) -> ModelStatus {
        ModelStatus::Mock
    }
}
