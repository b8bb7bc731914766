//! Diagnosis orchestration.
//!
//! [`Diagnoser`] is the single entry point the request-handling layer
//! calls: it runs inference, resolves the label against the curated
//! knowledge table, and merges both into one response object. It is a
//! total function over its input: every failure inside the pipeline
//! degrades to a well-formed, low-information diagnosis instead of an
//! error, so callers distinguish success from degradation by inspecting
//! the label and confidence, never by catching anything.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::{build_classifier, Classification, Classifier, ModelStatus};
use crate::config::DiagnosisConfig;
use crate::error::Result;
use crate::knowledge::{DiseaseRecord, KnowledgeBase};
use crate::preprocess::ImageInput;

/// The structured result of one leaf diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Raw label the classifier produced ("Error" when inference failed)
    pub disease_detected: String,
    /// Scientific name of the pathogen, or "Unknown"
    pub scientific_name: String,
    /// Classifier confidence in [0,1] (0.0 when inference failed)
    pub confidence: f32,
    /// Whether the leaf is considered healthy
    pub is_healthy: bool,
    /// Affected plant species, or "Unknown"
    pub plant_type: String,
    /// Visible symptoms
    pub symptoms: String,
    /// Likely causes
    pub causes: String,
    /// Treatment steps, in recommended order
    pub treatment_advice: Vec<String>,
    /// Prevention tips, in recommended order
    pub prevention_tips: Vec<String>,
}

impl Diagnosis {
    fn merge(classification: Classification, record: DiseaseRecord) -> Self {
        Self {
            disease_detected: classification.label,
            scientific_name: record.scientific_name,
            confidence: classification.confidence,
            is_healthy: record.is_healthy,
            plant_type: record.plant_type,
            symptoms: record.symptoms,
            causes: record.causes,
            treatment_advice: record.treatment_advice,
            prevention_tips: record.prevention_tips,
        }
    }
}

/// One diagnosis hand-off for an external history store.
#[derive(Debug, Clone, Copy)]
pub struct HistoryEntry<'a> {
    /// Label that was diagnosed
    pub label: &'a str,
    /// Classifier confidence
    pub confidence: f32,
    /// Healthy flag from the resolved record
    pub is_healthy: bool,
    /// Plant species from the resolved record
    pub plant_type: &'a str,
    /// Caller-supplied plant-type hint, if any (not used by inference)
    pub plant_type_hint: Option<&'a str>,
    /// The image as originally submitted
    pub image: ImageInput<'a>,
}

/// External collaborator that records diagnosis history.
///
/// The pipeline does not require recording to succeed and never inspects
/// the outcome beyond logging it.
pub trait HistorySink: Send + Sync {
    /// Record one diagnosis
    fn record(&self, entry: &HistoryEntry<'_>) -> Result<()>;
}

/// The diagnosis pipeline: normalizer, classifier, and knowledge table
/// composed behind one `diagnose` call.
pub struct Diagnoser {
    classifier: Box<dyn Classifier>,
    knowledge: KnowledgeBase,
    history: Option<Box<dyn HistorySink>>,
}

impl Diagnoser {
    /// Compose a pipeline from an explicit classifier and knowledge table.
    ///
    /// Construct once at process start and share; the classifier holds the
    /// expensive model state.
    pub fn new(classifier: Box<dyn Classifier>, knowledge: KnowledgeBase) -> Self {
        Self {
            classifier,
            knowledge,
            history: None,
        }
    }

    /// Build the configured classifier variant with the curated table
    pub fn from_config(config: &DiagnosisConfig) -> Self {
        Self::new(build_classifier(&config.classifier), KnowledgeBase::curated())
    }

    /// Attach a history collaborator
    pub fn with_history(mut self, sink: Box<dyn HistorySink>) -> Self {
        self.history = Some(sink);
        self
    }

    /// Whether a real model or the mock stand-in is answering
    pub fn model_status(&self) -> ModelStatus {
        self.classifier.status()
    }

    /// Diagnose a submitted leaf image. Never fails.
    pub fn diagnose(&self, input: ImageInput<'_>) -> Diagnosis {
        self.diagnose_with_hint(input, None)
    }

    /// Diagnose with an optional caller-supplied plant-type hint.
    ///
    /// The hint does not influence inference; it is only passed through to
    /// the history collaborator.
    pub fn diagnose_with_hint(
        &self,
        input: ImageInput<'_>,
        plant_type_hint: Option<&str>,
    ) -> Diagnosis {
        let classification = match self.classifier.predict(input) {
            Ok(classification) => classification,
            Err(e) => {
                warn!(error = %e, "inference failed, returning degraded diagnosis");
                Classification::degraded()
            }
        };

        debug!(
            label = %classification.label,
            confidence = classification.confidence,
            "resolving classifier label"
        );

        let record = self.knowledge.resolve(&classification.label);
        let diagnosis = Diagnosis::merge(classification, record);

        if let Some(sink) = &self.history {
            let entry = HistoryEntry {
                label: &diagnosis.disease_detected,
                confidence: diagnosis.confidence,
                is_healthy: diagnosis.is_healthy,
                plant_type: &diagnosis.plant_type,
                plant_type_hint,
                image: input,
            };
            if let Err(e) = sink.record(&entry) {
                warn!(error = %e, "history sink rejected diagnosis record");
            }
        }

        diagnosis
    }
}
