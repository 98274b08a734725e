//! Region healing module
//!
//! Cosmetic removal of small defects (watermarks, shop logos) reported by the
//! classification collaborator as permille boxes relative to the source image.
//!
//! # Example
//!
//! ```rust
//! use image::{Rgba, RgbaImage};
//! use listing_collage::{DefectBox, PixelRect, RegionHealer, RenderRect};
//!
//! let mut surface = RgbaImage::from_pixel(100, 100, Rgba([240, 240, 240, 255]));
//! let drawn = RenderRect::new(0.0, 0.0, 100.0, 100.0);
//! let cell = PixelRect::new(0, 0, 100, 100);
//! let healed = RegionHealer::default().heal(&mut surface, &DefectBox::new(800, 850, 950, 950), &drawn, &cell);
//! assert!(healed.is_some());
//! ```

mod healer;
mod types;

pub use healer::RegionHealer;
pub use types::{
    DefectBox, HealOptions, DEFAULT_BLUR_SIGMA, DEFAULT_EDGE_ALPHA, DEFAULT_HEAL_PAD,
    DEFAULT_NOISE_AMPLITUDE, PERMILLE,
};
