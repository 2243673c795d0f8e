//! Frame preparation for the detector

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ndarray::Array4;
use tracing::debug;

use crate::AnalyzerError;

/// RGB frame resized to the detector's square input
#[derive(Debug, Clone)]
pub struct PreparedFrame {
    image: RgbImage,
    /// Dimensions before resizing (width, height)
    source_dimensions: (u32, u32),
}

impl PreparedFrame {
    /// Decode an encoded image (PNG, JPEG, ...) and resize it to `size`x`size`
    pub fn from_bytes(bytes: &[u8], size: u32) -> Result<Self, AnalyzerError> {
        let decoded = image::load_from_memory(bytes)?;
        Self::from_image(decoded, size)
    }

    /// Open an image file and resize it to `size`x`size`
    pub fn open(path: impl AsRef<Path>, size: u32) -> Result<Self, AnalyzerError> {
        let decoded = image::open(path)?;
        Self::from_image(decoded, size)
    }

    /// Convert to RGB and stretch to a square; aspect ratio is not preserved
    pub fn from_image(image: DynamicImage, size: u32) -> Result<Self, AnalyzerError> {
        if size == 0 || image.width() == 0 || image.height() == 0 {
            return Err(AnalyzerError::EmptyFrame);
        }

        let source_dimensions = (image.width(), image.height());
        let rgb = image.to_rgb8();
        let image = if source_dimensions == (size, size) {
            rgb
        } else {
            image::imageops::resize(&rgb, size, size, FilterType::CatmullRom)
        };

        debug!(
            "Prepared frame {}x{} -> {}x{}",
            source_dimensions.0, source_dimensions.1, size, size
        );

        Ok(Self {
            image,
            source_dimensions,
        })
    }

    /// Side of the square frame
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn source_dimensions(&self) -> (u32, u32) {
        self.source_dimensions
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// NCHW tensor (1x3xSxS) scaled to 0..1, the usual YOLO input layout
    pub fn to_tensor(&self) -> Array4<f32> {
        let size = self.size() as usize;
        let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
        for (x, y, pixel) in self.image.enumerate_pixels() {
            for c in 0..3 {
                tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
            }
        }
        tensor
    }
}
