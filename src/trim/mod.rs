//! Content Bounding-Box Trimming module
//!
//! Detects the minimal rectangle enclosing the "content" of a product photo and
//! crops uniform white or transparent borders away before composition.
//!
//! # Algorithm
//!
//! 1. A pixel is content iff its alpha is at least [`DEFAULT_ALPHA_THRESHOLD`]
//!    and it is not near-white (not all of R, G, B above [`DEFAULT_WHITE_THRESHOLD`])
//! 2. Scan rows top-down and bottom-up for the first content row
//! 3. Scan columns inward, restricted to the vertical content band
//! 4. Copy the box with no resampling (pure crop)
//!
//! The trim is idempotent: trimming an already trimmed bitmap returns it unchanged.
//!
//! # Example
//!
//! ```rust,no_run
//! use listing_collage::ContentTrimmer;
//!
//! let img = image::open("product.png").unwrap().to_rgba8();
//! let trimmed = ContentTrimmer::default().trim(&img);
//! println!("{}x{}", trimmed.width(), trimmed.height());
//! ```

use image::{imageops, Rgba, RgbaImage};
use std::borrow::Cow;

// ============================================================
// Constants
// ============================================================

/// Pixels with alpha below this are treated as empty
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 50;

/// Channels strictly above this on all of R, G, B are treated as white background
pub const DEFAULT_WHITE_THRESHOLD: u8 = 230;

/// Smallest crop (per side) that is ever produced
pub const DEFAULT_MIN_CROP_SIZE: u32 = 10;

// ============================================================
// Types
// ============================================================

/// Content rectangle in source pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ContentBounds {
    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether the bounds cover the whole `width` x `height` image
    pub fn is_full(&self, width: u32, height: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width == width && self.height == height
    }
}

/// Options for content trimming
#[derive(Debug, Clone)]
pub struct TrimOptions {
    /// Minimum alpha for a pixel to count as content
    pub alpha_threshold: u8,
    /// Near-white threshold applied to every RGB channel
    pub white_threshold: u8,
    /// Minimum crop width and height
    pub min_crop_size: u32,
}

impl Default for TrimOptions {
    fn default() -> Self {
        Self {
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            white_threshold: DEFAULT_WHITE_THRESHOLD,
            min_crop_size: DEFAULT_MIN_CROP_SIZE,
        }
    }
}

impl TrimOptions {
    /// Create a builder
    pub fn builder() -> TrimOptionsBuilder {
        TrimOptionsBuilder::default()
    }
}

/// Builder for TrimOptions
#[derive(Debug, Default)]
pub struct TrimOptionsBuilder {
    options: TrimOptions,
}

impl TrimOptionsBuilder {
    /// Set alpha threshold
    #[must_use]
    pub fn alpha_threshold(mut self, threshold: u8) -> Self {
        self.options.alpha_threshold = threshold;
        self
    }

    /// Set white threshold
    #[must_use]
    pub fn white_threshold(mut self, threshold: u8) -> Self {
        self.options.white_threshold = threshold;
        self
    }

    /// Set minimum crop size (never below 1)
    #[must_use]
    pub fn min_crop_size(mut self, size: u32) -> Self {
        self.options.min_crop_size = size.max(1);
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> TrimOptions {
        self.options
    }
}

// ============================================================
// Trimmer
// ============================================================

/// Content bounding-box detector and cropper
#[derive(Debug, Clone, Default)]
pub struct ContentTrimmer {
    options: TrimOptions,
}

impl ContentTrimmer {
    /// Create a trimmer with the given options
    pub fn new(options: TrimOptions) -> Self {
        Self { options }
    }

    /// Current options
    pub fn options(&self) -> &TrimOptions {
        &self.options
    }

    /// Whether a single pixel is content
    pub fn is_content(&self, pixel: &Rgba<u8>) -> bool {
        let [r, g, b, a] = pixel.0;
        if a < self.options.alpha_threshold {
            return false;
        }
        let white = self.options.white_threshold;
        !(r > white && g > white && b > white)
    }

    /// Detect the content bounding box.
    ///
    /// Returns `None` when the image has no content row or the box collapses.
    pub fn content_bounds(&self, image: &RgbaImage) -> Option<ContentBounds> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return None;
        }

        let row_has_content =
            |y: u32| (0..width).any(|x| self.is_content(image.get_pixel(x, y)));

        let top = (0..height).find(|&y| row_has_content(y))?;
        let bottom = (0..height).rev().find(|&y| row_has_content(y))? + 1;

        let col_has_content =
            |x: u32| (top..bottom).any(|y| self.is_content(image.get_pixel(x, y)));

        let left = (0..width).find(|&x| col_has_content(x))?;
        let right = (0..width).rev().find(|&x| col_has_content(x))? + 1;

        if right <= left || bottom <= top {
            return None;
        }

        Some(ContentBounds {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    }

    /// Bounds that would actually be cropped, after the size and full-image checks
    pub fn crop_bounds(&self, image: &RgbaImage) -> Option<ContentBounds> {
        let bounds = self.content_bounds(image)?;
        let min = self.options.min_crop_size;
        if bounds.width < min || bounds.height < min {
            return None;
        }
        if bounds.is_full(image.width(), image.height()) {
            return None;
        }
        Some(bounds)
    }

    /// Trim borders. The original is returned (borrowed) whenever no valid crop exists.
    pub fn trim<'a>(&self, image: &'a RgbaImage) -> Cow<'a, RgbaImage> {
        match self.crop_bounds(image) {
            Some(b) => {
                Cow::Owned(imageops::crop_imm(image, b.x, b.y, b.width, b.height).to_image())
            }
            None => Cow::Borrowed(image),
        }
    }

    /// Trim and always return an owned bitmap
    pub fn trim_owned(&self, image: &RgbaImage) -> RgbaImage {
        self.trim(image).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([200, 20, 20, 255]);

    fn framed(width: u32, height: u32, rect: (u32, u32, u32, u32)) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(width, height, WHITE);
        let (x0, y0, w, h) = rect;
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, RED);
            }
        }
        img
    }

    #[test]
    fn test_default_options() {
        let opts = TrimOptions::default();
        assert_eq!(opts.alpha_threshold, 50);
        assert_eq!(opts.white_threshold, 230);
        assert_eq!(opts.min_crop_size, 10);
    }

    #[test]
    fn test_builder() {
        let opts = TrimOptions::builder()
            .alpha_threshold(10)
            .white_threshold(200)
            .min_crop_size(0)
            .build();
        assert_eq!(opts.alpha_threshold, 10);
        assert_eq!(opts.white_threshold, 200);
        assert_eq!(opts.min_crop_size, 1);
    }

    #[test]
    fn test_is_content() {
        let trimmer = ContentTrimmer::default();
        assert!(trimmer.is_content(&RED));
        assert!(!trimmer.is_content(&WHITE));
        assert!(!trimmer.is_content(&Rgba([0, 0, 0, 49])));
        assert!(trimmer.is_content(&Rgba([0, 0, 0, 50])));
        // One channel at the threshold keeps it as content
        assert!(trimmer.is_content(&Rgba([230, 255, 255, 255])));
    }

    #[test]
    fn test_trims_white_border() {
        let img = framed(100, 80, (20, 10, 30, 40));
        let trimmer = ContentTrimmer::default();

        let bounds = trimmer.content_bounds(&img).unwrap();
        assert_eq!(
            bounds,
            ContentBounds {
                x: 20,
                y: 10,
                width: 30,
                height: 40
            }
        );

        let trimmed = trimmer.trim(&img);
        assert!(matches!(trimmed, Cow::Owned(_)));
        assert_eq!(trimmed.dimensions(), (30, 40));
        assert_eq!(*trimmed.get_pixel(0, 0), RED);
        assert_eq!(*trimmed.get_pixel(29, 39), RED);
    }

    #[test]
    fn test_trims_transparent_border() {
        let mut img = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 0]));
        for y in 5..45 {
            for x in 10..40 {
                img.put_pixel(x, y, Rgba([10, 10, 10, 255]));
            }
        }
        let trimmed = ContentTrimmer::default().trim_owned(&img);
        assert_eq!(trimmed.dimensions(), (30, 40));
    }

    #[test]
    fn test_idempotent() {
        let img = framed(120, 90, (7, 13, 60, 50));
        let trimmer = ContentTrimmer::default();
        let once = trimmer.trim_owned(&img);
        let twice = trimmer.trim(&once);
        assert!(matches!(twice, Cow::Borrowed(_)));
        assert_eq!(once, *twice);
    }

    #[test]
    fn test_all_white_unchanged() {
        let img = RgbaImage::from_pixel(40, 40, WHITE);
        let trimmer = ContentTrimmer::default();
        assert!(trimmer.content_bounds(&img).is_none());
        assert!(matches!(trimmer.trim(&img), Cow::Borrowed(_)));
    }

    #[test]
    fn test_fully_transparent_unchanged() {
        let img = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 0]));
        let trimmed = ContentTrimmer::default().trim(&img);
        assert_eq!(trimmed.dimensions(), (40, 40));
    }

    #[test]
    fn test_tiny_content_unchanged() {
        let img = framed(100, 100, (50, 50, 9, 30));
        let trimmer = ContentTrimmer::default();
        assert!(trimmer.content_bounds(&img).is_some());
        assert!(trimmer.crop_bounds(&img).is_none());
        assert!(matches!(trimmer.trim(&img), Cow::Borrowed(_)));
    }

    #[test]
    fn test_full_content_unchanged() {
        let img = RgbaImage::from_pixel(30, 30, RED);
        let trimmer = ContentTrimmer::default();
        assert!(trimmer.crop_bounds(&img).is_none());
        assert!(matches!(trimmer.trim(&img), Cow::Borrowed(_)));
    }

    #[test]
    fn test_horizontal_scan_limited_to_content_band() {
        // Content pixel outside [top, bottom) cannot exist by construction,
        // but a content column must be found within the band.
        let mut img = framed(60, 60, (10, 20, 20, 20));
        img.put_pixel(55, 25, RED);
        let bounds = ContentTrimmer::default().content_bounds(&img).unwrap();
        assert_eq!(bounds.x, 10);
        assert_eq!(bounds.right(), 56);
        assert_eq!(bounds.y, 20);
        assert_eq!(bounds.bottom(), 40);
    }

    #[test]
    fn test_crop_within_source_bounds() {
        let img = framed(64, 48, (0, 0, 64, 20));
        let trimmer = ContentTrimmer::default();
        let bounds = trimmer.crop_bounds(&img).unwrap();
        assert!(bounds.right() <= 64);
        assert!(bounds.bottom() <= 48);
        assert!(bounds.width >= 10 && bounds.height >= 10);
    }

    #[test]
    fn test_empty_image() {
        let img = RgbaImage::new(0, 0);
        let trimmer = ContentTrimmer::default();
        assert!(trimmer.content_bounds(&img).is_none());
        assert_eq!(trimmer.trim(&img).dimensions(), (0, 0));
    }
}
