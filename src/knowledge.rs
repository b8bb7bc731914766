//! Curated disease knowledge and label resolution.
//!
//! Classifier vocabularies are inconsistent across model sources
//! (underscores, parentheses, casing all vary), so resolution uses a
//! lower-cased substring match over an *ordered* list of
//! `(fragment, record)` pairs. The first fragment contained in the label
//! wins; table order is part of the observable contract and must be
//! preserved when entries are added.

use serde::{Deserialize, Serialize};

/// Curated agronomic metadata for one disease (or healthy) category.
///
/// Immutable reference data: built once, only ever read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    /// Scientific name of the pathogen, or "Healthy plant"
    pub scientific_name: String,
    /// Affected plant species
    pub plant_type: String,
    /// Visible symptoms on the leaf
    pub symptoms: String,
    /// What causes the condition
    pub causes: String,
    /// Treatment steps, in recommended order
    pub treatment_advice: Vec<String>,
    /// Prevention tips, in recommended order
    pub prevention_tips: Vec<String>,
    /// Whether this category represents a healthy plant
    pub is_healthy: bool,
}

fn record(
    scientific_name: &str,
    plant_type: &str,
    symptoms: &str,
    causes: &str,
    treatment_advice: &[&str],
    prevention_tips: &[&str],
    is_healthy: bool,
) -> DiseaseRecord {
    DiseaseRecord {
        scientific_name: scientific_name.to_string(),
        plant_type: plant_type.to_string(),
        symptoms: symptoms.to_string(),
        causes: causes.to_string(),
        treatment_advice: treatment_advice.iter().map(|s| s.to_string()).collect(),
        prevention_tips: prevention_tips.iter().map(|s| s.to_string()).collect(),
        is_healthy,
    }
}

/// Ordered table of disease-name fragments and their curated records.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<(String, DiseaseRecord)>,
}

impl KnowledgeBase {
    /// Build a knowledge base from an explicit ordered table.
    ///
    /// Fragments are matched in the given order; keep them lower-case.
    pub fn new(entries: Vec<(String, DiseaseRecord)>) -> Self {
        Self { entries }
    }

    /// The built-in curated table.
    ///
    /// Entry order is load-bearing: when several fragments are substrings
    /// of the same label, the earliest entry wins.
    pub fn curated() -> Self {
        let entries = vec![
            (
                "corn common rust".to_string(),
                record(
                    "Puccinia sorghi",
                    "Corn",
                    "Small reddish-brown pustules on leaves.",
                    "Fungal infection in warm, humid conditions.",
                    &[
                        "Apply appropriate fungicides",
                        "Remove infected leaves",
                        "Use resistant varieties",
                    ],
                    &[
                        "Rotate crops",
                        "Avoid overhead irrigation",
                        "Plant resistant hybrids",
                    ],
                    false,
                ),
            ),
            (
                "corn healthy".to_string(),
                record(
                    "Healthy plant",
                    "Corn",
                    "Green healthy leaves with no spots.",
                    "Good growing conditions.",
                    &["No treatment needed."],
                    &["Maintain good agronomic practices."],
                    true,
                ),
            ),
            (
                "potato early blight".to_string(),
                record(
                    "Alternaria solani",
                    "Potato",
                    "Brown spots with concentric rings on leaves.",
                    "Fungal pathogen.",
                    &["Apply fungicides", "Remove infected leaves"],
                    &["Crop rotation", "Avoid wet foliage"],
                    false,
                ),
            ),
            (
                "potato healthy".to_string(),
                record(
                    "Healthy plant",
                    "Potato",
                    "Normal green leaves.",
                    "Good plant health.",
                    &["No action needed."],
                    &["Continue good practices."],
                    true,
                ),
            ),
            (
                "tomato early blight".to_string(),
                record(
                    "Alternaria solani",
                    "Tomato",
                    "Dark brown spots with rings.",
                    "Fungal disease.",
                    &["Apply copper-based fungicides", "Remove infected parts"],
                    &["Crop rotation", "Proper spacing"],
                    false,
                ),
            ),
            (
                "tomato healthy".to_string(),
                record(
                    "Healthy plant",
                    "Tomato",
                    "Green healthy leaves.",
                    "Good care.",
                    &["No treatment needed."],
                    &["Maintain good care."],
                    true,
                ),
            ),
            // Later additions go below the original entries so existing
            // first-match behavior stays byte-identical.
            (
                "potato late blight".to_string(),
                record(
                    "Phytophthora infestans",
                    "Potato",
                    "Water-soaked lesions turning dark brown on leaves and stems.",
                    "Oomycete pathogen in cool, wet weather.",
                    &[
                        "Apply fungicides containing chlorothalonil or metalaxyl",
                        "Remove infected plants immediately",
                        "Avoid overhead watering",
                    ],
                    &[
                        "Plant certified seed potatoes",
                        "Destroy cull piles and volunteer plants",
                    ],
                    false,
                ),
            ),
            (
                "tomato late blight".to_string(),
                record(
                    "Phytophthora infestans",
                    "Tomato",
                    "Large greasy gray-green blotches on leaves.",
                    "Oomycete pathogen spread by wind-driven rain.",
                    &[
                        "Apply fungicides containing chlorothalonil or metalaxyl",
                        "Remove infected plants immediately",
                        "Avoid overhead watering",
                    ],
                    &["Stake plants for airflow", "Water at the base of plants"],
                    false,
                ),
            ),
            (
                "squash powdery mildew".to_string(),
                record(
                    "Podosphaera xanthii",
                    "Squash",
                    "White powdery patches on leaf surfaces.",
                    "Fungal spores spreading in warm, dry conditions.",
                    &[
                        "Apply sulfur-based fungicides",
                        "Use neem oil as organic treatment",
                        "Improve air circulation around plants",
                    ],
                    &["Plant resistant varieties", "Ensure proper plant spacing"],
                    false,
                ),
            ),
            (
                "peach bacterial spot".to_string(),
                record(
                    "Xanthomonas arboricola",
                    "Peach",
                    "Small dark lesions on leaves and fruit.",
                    "Bacterial infection favored by warm, wet springs.",
                    &[
                        "Apply copper-based bactericides",
                        "Use streptomycin sprays",
                        "Remove and destroy infected plants",
                    ],
                    &["Choose resistant cultivars", "Avoid overhead irrigation"],
                    false,
                ),
            ),
        ];

        Self { entries }
    }

    /// Number of curated entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the table in match order
    pub fn entries(&self) -> impl Iterator<Item = &(String, DiseaseRecord)> {
        self.entries.iter()
    }

    /// Map a raw classifier label to a curated record.
    ///
    /// The label is lower-cased and the table scanned in declaration
    /// order; the first fragment that is a substring of the label wins.
    /// When nothing matches, a generic fallback record is synthesized.
    pub fn resolve(&self, label: &str) -> DiseaseRecord {
        let lowered = label.to_lowercase();

        for (fragment, entry) in &self.entries {
            if lowered.contains(fragment.as_str()) {
                return entry.clone();
            }
        }

        Self::fallback(&lowered)
    }

    /// Generic record for labels with no curated entry.
    ///
    /// The healthy flag comes solely from whether "healthy" appears in the
    /// lower-cased label.
    fn fallback(lowered_label: &str) -> DiseaseRecord {
        DiseaseRecord {
            scientific_name: "Unknown".to_string(),
            plant_type: "Unknown".to_string(),
            symptoms: "Symptoms not available.".to_string(),
            causes: "Cause unknown.".to_string(),
            treatment_advice: vec!["Consult agricultural expert.".to_string()],
            prevention_tips: vec!["Monitor plant health regularly.".to_string()],
            is_healthy: lowered_label.contains("healthy"),
        }
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::curated()
    }
}
