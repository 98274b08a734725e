//! Cover Generator
//!
//! Produces one full-bleed vertical cover (2160x3840 by default) from a single
//! source image, independent of the grid compositor.
//!
//! # Algorithm
//!
//! 1. Fill the target with the background color
//! 2. Scale the source to cover the whole target (never letterbox)
//! 3. Center-crop the overflowing axis
//! 4. Resample with Lanczos3

use image::{imageops::FilterType, Rgba, RgbaImage};

use crate::geometry::PixelRect;
use crate::layout::{
    draw_cover, encode_png, LayoutError, Result, DEFAULT_BACKGROUND, DEFAULT_OUTPUT_HEIGHT,
    DEFAULT_OUTPUT_WIDTH,
};

/// Full-bleed cover generator
#[derive(Debug, Clone)]
pub struct CoverGenerator {
    width: u32,
    height: u32,
    background: [u8; 3],
    filter: FilterType,
}

impl Default for CoverGenerator {
    fn default() -> Self {
        Self {
            width: DEFAULT_OUTPUT_WIDTH,
            height: DEFAULT_OUTPUT_HEIGHT,
            background: DEFAULT_BACKGROUND,
            filter: FilterType::Lanczos3,
        }
    }
}

impl CoverGenerator {
    /// Generator for a custom target size
    pub fn with_size(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LayoutError::InvalidConfig(format!(
                "cover size must be positive, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }

    /// Resampling filter; anything but Nearest
    #[must_use]
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        if filter != FilterType::Nearest {
            self.filter = filter;
        }
        self
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Render the cover. An empty source yields a plain background.
    pub fn generate(&self, source: &RgbaImage) -> RgbaImage {
        let [r, g, b] = self.background;
        let mut surface = RgbaImage::from_pixel(self.width, self.height, Rgba([r, g, b, 255]));
        let target = PixelRect::new(0, 0, self.width, self.height);
        if draw_cover(&mut surface, source, &target, self.filter).is_none() {
            tracing::warn!("Cover source is empty; emitting background only");
        }
        surface
    }

    /// Render and encode as PNG
    pub fn generate_png(&self, source: &RgbaImage) -> Result<Vec<u8>> {
        encode_png(&self.generate(source))
    }
}
