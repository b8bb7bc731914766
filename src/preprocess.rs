//! Image ingestion and normalization.
//!
//! Decodes raw image bytes (or a file on disk) into a fixed-shape RGB
//! tensor with values scaled to [0,1], ready for model consumption. The
//! normalizer knows nothing about which classifier consumes its output, so
//! either classifier variant can be swapped without touching ingestion.

use std::path::Path;

use image::{imageops::FilterType, DynamicImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Image dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageDimensions {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of channels (3 for RGB)
    pub channels: u32,
}

impl ImageDimensions {
    /// Creates new image dimensions
    pub fn new(width: u32, height: u32, channels: u32) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    /// Square RGB dimensions of the given side length
    pub fn rgb(size: u32) -> Self {
        Self::new(size, size, 3)
    }

    /// Total number of values in a tensor of these dimensions
    pub fn total_values(&self) -> usize {
        (self.width * self.height * self.channels) as usize
    }
}

/// A submitted image, as raw bytes or a path to a readable file.
///
/// Consumed once per request; the format (JPEG/PNG/...) is inferred by the
/// decoder.
#[derive(Debug, Clone, Copy)]
pub enum ImageInput<'a> {
    /// Raw encoded image bytes
    Bytes(&'a [u8]),
    /// Path to an image file on disk
    Path(&'a Path),
}

impl<'a> From<&'a [u8]> for ImageInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ImageInput::Bytes(bytes)
    }
}

impl<'a> From<&'a Path> for ImageInput<'a> {
    fn from(path: &'a Path) -> Self {
        ImageInput::Path(path)
    }
}

/// Decode a submitted image into pixel data.
///
/// Corrupt bytes, an empty buffer, an unreadable file, or an unsupported
/// format all surface as [`Error::Decode`]. Callers must treat this as
/// terminal for the request: the photo itself has to be re-submitted.
pub fn decode(input: ImageInput<'_>) -> Result<DynamicImage> {
    match input {
        ImageInput::Bytes(bytes) => {
            if bytes.is_empty() {
                return Err(Error::Decode("empty image buffer".to_string()));
            }
            image::load_from_memory(bytes)
                .map_err(|e| Error::Decode(format!("unreadable image bytes: {e}")))
        }
        ImageInput::Path(path) => image::open(path)
            .map_err(|e| Error::Decode(format!("failed to decode {}: {e}", path.display()))),
    }
}

/// Configuration for image normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Target tensor dimensions
    pub target_size: ImageDimensions,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            target_size: ImageDimensions::rgb(256),
        }
    }
}

/// A decoded image resized to a fixed shape, RGB, values in [0,1].
///
/// Stored in HWC layout (rows of interleaved RGB pixels). Request-scoped:
/// created for one inference call and discarded afterwards.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pixels: Vec<f32>,
    dims: ImageDimensions,
}

impl NormalizedImage {
    /// Tensor shape as [height, width, channels]
    pub fn shape(&self) -> [usize; 3] {
        [
            self.dims.height as usize,
            self.dims.width as usize,
            self.dims.channels as usize,
        ]
    }

    /// The dimensions this image was normalized to
    pub fn dimensions(&self) -> ImageDimensions {
        self.dims
    }

    /// Flat HWC pixel data
    pub fn as_slice(&self) -> &[f32] {
        &self.pixels
    }

    /// Convert to CHW layout (all R values, then G, then B), for models
    /// that consume channels-first tensors.
    pub fn to_chw(&self) -> Vec<f32> {
        let num_pixels = (self.dims.width * self.dims.height) as usize;
        let channels = self.dims.channels as usize;

        let mut chw = vec![0.0f32; self.pixels.len()];
        for i in 0..num_pixels {
            for c in 0..channels {
                chw[c * num_pixels + i] = self.pixels[i * channels + c];
            }
        }
        chw
    }
}

/// Normalizer turning submitted images into canonical model input tensors
#[derive(Debug, Clone, Default)]
pub struct ImageNormalizer {
    config: NormalizeConfig,
}

impl ImageNormalizer {
    /// Creates a normalizer with the given configuration
    pub fn new(config: NormalizeConfig) -> Self {
        Self { config }
    }

    /// Creates a normalizer producing square RGB tensors of the given size
    pub fn with_size(size: u32) -> Self {
        Self::new(NormalizeConfig {
            target_size: ImageDimensions::rgb(size),
        })
    }

    /// Decode and normalize a submitted image
    pub fn normalize_input(&self, input: ImageInput<'_>) -> Result<NormalizedImage> {
        Ok(self.normalize(&decode(input)?))
    }

    /// Decode and normalize raw image bytes
    pub fn normalize_bytes(&self, bytes: &[u8]) -> Result<NormalizedImage> {
        self.normalize_input(ImageInput::Bytes(bytes))
    }

    /// Load and normalize an image file
    pub fn normalize_path(&self, path: &Path) -> Result<NormalizedImage> {
        self.normalize_input(ImageInput::Path(path))
    }

    /// Normalize an already-decoded image
    pub fn normalize(&self, image: &DynamicImage) -> NormalizedImage {
        let ImageDimensions { width, height, .. } = self.config.target_size;

        let resized = image.resize_exact(width, height, FilterType::Lanczos3);
        let rgb = resized.to_rgb8();

        // as_raw is already HWC interleaved RGB
        let pixels = rgb.as_raw().iter().map(|&v| v as f32 / 255.0).collect();

        NormalizedImage {
            pixels,
            dims: self.config.target_size,
        }
    }

    /// The shape every normalized tensor will have, as [height, width, channels]
    pub fn output_shape(&self) -> [usize; 3] {
        [
            self.config.target_size.height as usize,
            self.config.target_size.width as usize,
            self.config.target_size.channels as usize,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128u8])
        }))
    }

    #[test]
    fn test_normalize_shape_and_range() {
        let normalizer = ImageNormalizer::default();
        let normalized = normalizer.normalize(&test_image(100, 80));

        assert_eq!(normalized.shape(), [256, 256, 3]);
        assert_eq!(normalized.as_slice().len(), 256 * 256 * 3);
        assert!(normalized
            .as_slice()
            .iter()
            .all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_normalize_custom_size() {
        let normalizer = ImageNormalizer::with_size(224);
        let normalized = normalizer.normalize(&test_image(512, 512));

        assert_eq!(normalized.shape(), [224, 224, 3]);
        assert_eq!(normalizer.output_shape(), [224, 224, 3]);
    }

    #[test]
    fn test_to_chw_layout() {
        let normalizer = ImageNormalizer::with_size(2);
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(2, 2, Rgb([255u8, 0u8, 0u8])));
        let normalized = normalizer.normalize(&img);

        let chw = normalized.to_chw();
        assert_eq!(chw.len(), 12);
        // Red channel block first, all ones
        assert!(chw[..4].iter().all(|&v| (v - 1.0).abs() < 1e-6));
        // Green and blue blocks zero
        assert!(chw[4..].iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn test_decode_empty_buffer() {
        let result = decode(ImageInput::Bytes(&[]));
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_corrupt_bytes() {
        let result = decode(ImageInput::Bytes(&[0xde, 0xad, 0xbe, 0xef]));
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_missing_file() {
        let result = decode(ImageInput::Path(Path::new("/nonexistent/leaf.jpg")));
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_normalize_bytes_roundtrip() {
        let mut encoded = Vec::new();
        test_image(32, 32)
            .write_to(
                &mut std::io::Cursor::new(&mut encoded),
                image::ImageFormat::Png,
            )
            .unwrap();

        let normalizer = ImageNormalizer::default();
        let normalized = normalizer.normalize_bytes(&encoded).unwrap();
        assert_eq!(normalized.shape(), [256, 256, 3]);
    }
}
