//! Grid layout module
//!
//! Renders 1, 2 or 4 candidate images into a single fixed-size canvas.
//!
//! # Features
//!
//! - Five named layouts: 2x1, 1x2, 2x2, 4x1, 1x1
//! - Cover-fit per cell (scale to fill, center, clip)
//! - Optional border trimming, defect healing and labels
//!
//! # Example
//!
//! ```rust
//! use image::{Rgba, RgbaImage};
//! use listing_collage::{CandidateImage, CompositionConfig, Compositor, LayoutKind, SourceImage};
//!
//! let images: Vec<_> = (0..2)
//!     .map(|i| {
//!         let bitmap = RgbaImage::from_pixel(60, 80, Rgba([i * 100, 0, 0, 255]));
//!         CandidateImage::plain(SourceImage::from_bitmap(format!("look_{i}.png"), bitmap))
//!     })
//!     .collect();
//! let config = CompositionConfig::builder().output_size(216, 384).build();
//! let canvas = Compositor::default()
//!     .compose(&images, LayoutKind::TwoByOne, &config)
//!     .unwrap();
//! assert_eq!(canvas.dimensions(), (216, 384));
//! ```

mod compositor;
mod fit;
mod grid;
mod types;

pub use compositor::{encode_png, Compositor};
pub use fit::{draw_cover, CoverFit};
pub use grid::cell_rects;
pub use types::{
    CompositionConfig, CompositionConfigBuilder, LayoutError, LayoutKind, Result,
    DEFAULT_BACKGROUND, DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH,
};
