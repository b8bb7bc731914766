//! End-to-end tests for the diagnosis pipeline.

use std::io::Write;
use std::sync::Arc;
use std::thread;

use image::{DynamicImage, ImageBuffer, Rgb};

use plant_diagnosis::{
    ClassifierConfig, DiagnosisConfig, Diagnoser, ImageInput, MockClassifier, MockConfig,
    ModelStatus, OnnxConfig,
};

/// Encode a solid-color PNG in memory.
fn png_bytes(r: u8, g: u8, b: u8) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(64, 64, Rgb([r, g, b])));
    let mut encoded = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut encoded),
        image::ImageFormat::Png,
    )
    .unwrap();
    encoded
}

fn seeded_diagnoser(seed: u64) -> Diagnoser {
    Diagnoser::new(
        Box::new(MockClassifier::with_seed(seed)),
        plant_diagnosis::KnowledgeBase::curated(),
    )
}

#[test]
fn diagnose_valid_photo_returns_complete_payload() {
    let diagnoser = seeded_diagnoser(42);
    let bytes = png_bytes(40, 160, 60);

    let diagnosis = diagnoser.diagnose(ImageInput::Bytes(&bytes));

    assert_ne!(diagnosis.disease_detected, "Error");
    assert!(!diagnosis.disease_detected.is_empty());
    assert!((0.0..=1.0).contains(&diagnosis.confidence));
    assert!(!diagnosis.scientific_name.is_empty());
    assert!(!diagnosis.plant_type.is_empty());
    assert!(!diagnosis.symptoms.is_empty());
    assert!(!diagnosis.causes.is_empty());
    assert!(!diagnosis.treatment_advice.is_empty());
    assert!(!diagnosis.prevention_tips.is_empty());
}

#[test]
fn diagnose_empty_buffer_degrades_instead_of_failing() {
    let diagnoser = seeded_diagnoser(42);
    let diagnosis = diagnoser.diagnose(ImageInput::Bytes(&[]));

    assert_eq!(diagnosis.disease_detected, "Error");
    assert_eq!(diagnosis.confidence, 0.0);
    assert_eq!(diagnosis.scientific_name, "Unknown");
    assert_eq!(diagnosis.plant_type, "Unknown");
    assert_eq!(
        diagnosis.treatment_advice,
        vec!["Consult agricultural expert."]
    );
    assert!(!diagnosis.is_healthy);
}

#[test]
fn diagnose_corrupt_bytes_degrades() {
    let diagnoser = seeded_diagnoser(42);
    let diagnosis = diagnoser.diagnose(ImageInput::Bytes(b"not an image at all"));

    assert_eq!(diagnosis.disease_detected, "Error");
    assert_eq!(diagnosis.confidence, 0.0);
}

#[test]
fn diagnose_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaf.png");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(&png_bytes(50, 140, 70)).unwrap();

    let diagnoser = seeded_diagnoser(42);
    let diagnosis = diagnoser.diagnose(ImageInput::Path(&path));

    assert_ne!(diagnosis.disease_detected, "Error");
}

#[test]
fn diagnose_missing_path_degrades() {
    let diagnoser = seeded_diagnoser(42);
    let diagnosis = diagnoser.diagnose(ImageInput::Path(std::path::Path::new(
        "/nonexistent/leaf.png",
    )));

    assert_eq!(diagnosis.disease_detected, "Error");
    assert_eq!(diagnosis.confidence, 0.0);
}

#[test]
fn unloadable_model_falls_back_to_mock_process_wide() {
    let config = DiagnosisConfig {
        classifier: ClassifierConfig::Onnx(OnnxConfig {
            model_path: "/nonexistent/crop_leaf.onnx".into(),
            labels_path: None,
            image_size: 224,
        }),
    };

    let diagnoser = Diagnoser::from_config(&config);
    assert_eq!(diagnoser.model_status(), ModelStatus::Mock);

    // The degraded deployment still serves well-formed diagnoses.
    let bytes = png_bytes(60, 150, 80);
    let diagnosis = diagnoser.diagnose(ImageInput::Bytes(&bytes));
    assert!((0.0..=1.0).contains(&diagnosis.confidence));
}

#[test]
fn explicit_mock_config_reports_mock_status() {
    let config = DiagnosisConfig {
        classifier: ClassifierConfig::Mock(MockConfig {
            seed: Some(9),
            image_size: 256,
        }),
    };

    let diagnoser = Diagnoser::from_config(&config);
    assert_eq!(diagnoser.model_status(), ModelStatus::Mock);
    assert_eq!(
        diagnoser.model_status().message(),
        "Using Mock Model"
    );
}

#[test]
fn concurrent_diagnoses_are_independent() {
    let diagnoser = Arc::new(seeded_diagnoser(1234));

    let images: Vec<Vec<u8>> = (0..100)
        .map(|i| png_bytes((i * 2) as u8, 128, (255 - i * 2) as u8))
        .collect();

    let handles: Vec<_> = images
        .into_iter()
        .map(|bytes| {
            let diagnoser = Arc::clone(&diagnoser);
            thread::spawn(move || diagnoser.diagnose(ImageInput::Bytes(&bytes)))
        })
        .collect();

    for handle in handles {
        let diagnosis = handle.join().unwrap();

        // Every parallel call must come back well-formed, with no
        // cross-contamination between requests.
        assert_ne!(diagnosis.disease_detected, "Error");
        assert!((0.0..=1.0).contains(&diagnosis.confidence));
        assert!(!diagnosis.treatment_advice.is_empty());
    }
}

#[test]
fn diagnosis_serializes_for_the_boundary_layer() {
    let diagnoser = seeded_diagnoser(42);
    let bytes = png_bytes(40, 160, 60);
    let diagnosis = diagnoser.diagnose(ImageInput::Bytes(&bytes));

    let json = serde_json::to_string(&diagnosis).unwrap();
    for field in [
        "disease_detected",
        "scientific_name",
        "confidence",
        "is_healthy",
        "plant_type",
        "symptoms",
        "causes",
        "treatment_advice",
        "prevention_tips",
    ] {
        assert!(json.contains(field), "missing field {field}");
    }
}
