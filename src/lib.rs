//! # Plant Diagnosis
//!
//! A library for diagnosing plant leaf diseases from photographs: decode
//! and normalize the image, classify it with a pretrained model (or a mock
//! stand-in when no model is available), map the raw label to curated
//! agronomic knowledge, and return one structured diagnosis.
//!
//! ## Modules
//!
//! - `preprocess`: image decoding and tensor normalization
//! - `classifier`: the `Classifier` trait and its ONNX/mock variants
//! - `knowledge`: curated disease table and fallback resolution
//! - `diagnosis`: the `Diagnoser` orchestrator and response type
//! - `config`: deployment configuration (TOML)
//! - `classes`: the built-in classifier vocabulary
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plant_diagnosis::{DiagnosisConfig, Diagnoser, ImageInput};
//!
//! let config = DiagnosisConfig::from_toml("diagnosis.toml".as_ref())?;
//! let diagnoser = Diagnoser::from_config(&config);
//!
//! let photo = std::fs::read("leaf.jpg")?;
//! let diagnosis = diagnoser.diagnose(ImageInput::Bytes(&photo));
//! println!("{}: {:.1}%", diagnosis.disease_detected, diagnosis.confidence * 100.0);
//! ```

pub mod classes;
pub mod classifier;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod knowledge;
pub mod logging;
pub mod preprocess;

// Re-export commonly used items for convenience
pub use classifier::{
    build_classifier, Classification, Classifier, MockClassifier, ModelStatus, OnnxClassifier,
};
pub use config::{ClassifierConfig, DiagnosisConfig, MockConfig, OnnxConfig};
pub use diagnosis::{Diagnosis, Diagnoser, HistoryEntry, HistorySink};
pub use error::{Error, Result};
pub use knowledge::{DiseaseRecord, KnowledgeBase};
pub use preprocess::{
    ImageDimensions, ImageInput, ImageNormalizer, NormalizeConfig, NormalizedImage,
};

/// Default preprocessing size for the mock classifier
pub const DEFAULT_IMAGE_SIZE: u32 = 256;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
