//! Classifier vocabulary for the bundled mock model.
//!
//! The labels mirror the PlantVillage-style vocabulary the pretrained
//! crop-leaf classifiers are trained on. Formatting is inconsistent on
//! purpose (underscores, parentheses, mixed casing): that is what real
//! model vocabularies look like, and the knowledge resolver is built to
//! cope with it.

/// Total number of classes in the mock vocabulary
pub const NUM_CLASSES: usize = 38;

/// Class names, in model output order.
/// Format: "Plant_Disease" or "Plant_healthy"
pub const CLASS_NAMES: [&str; 38] = [
    "Apple_Apple_scab",
    "Apple_Black_rot",
    "Apple_Cedar_apple_rust",
    "Apple_healthy",
    "Blueberry_healthy",
    "Cherry_healthy",
    "Cherry_Powdery_mildew",
    "Corn_Cercospora_leaf_spot Gray_leaf_spot",
    "Corn_Common_rust",
    "Corn_healthy",
    "Corn_Northern_Leaf_Blight",
    "Grape_Black_rot",
    "Grape_Esca_(Black_Measles)",
    "Grape_healthy",
    "Grape_Leaf_blight_(Isariopsis_Leaf_Spot)",
    "Orange_Haunglongbing_(Citrus_greening)",
    "Peach_Bacterial_spot",
    "Peach_healthy",
    "Pepper_bell_Bacterial_spot",
    "Pepper_bell_healthy",
    "Potato_Early_blight",
    "Potato_healthy",
    "Potato_Late_blight",
    "Raspberry_healthy",
    "Soybean_healthy",
    "Squash_Powdery_mildew",
    "Strawberry_healthy",
    "Strawberry_Leaf_scorch",
    "Tomato_Bacterial_spot",
    "Tomato_Early_blight",
    "Tomato_healthy",
    "Tomato_Late_blight",
    "Tomato_Leaf_Mold",
    "Tomato_Septoria_leaf_spot",
    "Tomato_Spider_mites Two-spotted_spider_mite",
    "Tomato_Target_Spot",
    "Tomato_Tomato_mosaic_virus",
    "Tomato_Tomato_YellowLeaf_Curl_Virus",
];

/// Get the class name for a given label index
pub fn class_name(label: usize) -> Option<&'static str> {
    CLASS_NAMES.get(label).copied()
}

/// Get the label index for a given class name
pub fn class_index(name: &str) -> Option<usize> {
    CLASS_NAMES.iter().position(|&n| n == name)
}

/// Check if a class represents a healthy plant (not diseased)
pub fn is_healthy_class(label: usize) -> bool {
    CLASS_NAMES
        .get(label)
        .map(|name| name.to_lowercase().contains("healthy"))
        .unwrap_or(false)
}

/// Get the plant name from a class (e.g., "Tomato" from "Tomato_Early_blight")
pub fn plant_name(label: usize) -> Option<&'static str> {
    CLASS_NAMES
        .get(label)
        .and_then(|name| name.split('_').next())
}
