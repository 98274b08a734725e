//! Grid Compositor
//!
//! Renders N candidate images into one output canvas.
//!
//! # Algorithm
//!
//! 1. Fill the canvas with the background color
//! 2. Trim uniform borders from every source (in parallel)
//! 3. Cover-fit each source into its cell, clipped to the cell
//! 4. Heal the reported defect of each cell, if enabled
//! 5. Draw per-cell captions (corner mode) or one centered title (center mode)

use image::{buffer::ConvertBuffer, imageops::FilterType, ImageFormat, Rgba, RgbImage, RgbaImage};
use rayon::prelude::*;
use std::borrow::Cow;
use std::io::Cursor;
use tracing::{debug, warn};

use super::fit::draw_cover;
use super::grid::cell_rects;
use super::types::{CompositionConfig, LayoutError, LayoutKind, Result};
use crate::candidate::CandidateImage;
use crate::geometry::PixelRect;
use crate::heal::RegionHealer;
use crate::label::{LabelAnchor, TextLabelRenderer};
use crate::trim::ContentTrimmer;

/// Resampling filter for cell contents
const CELL_FILTER: FilterType = FilterType::CatmullRom;

/// Grid compositor
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    trimmer: ContentTrimmer,
    healer: RegionHealer,
    labels: TextLabelRenderer,
}

impl Compositor {
    /// Create a compositor that draws labels with `labels`
    pub fn new(labels: TextLabelRenderer) -> Self {
        Self {
            labels,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_trimmer(mut self, trimmer: ContentTrimmer) -> Self {
        self.trimmer = trimmer;
        self
    }

    #[must_use]
    pub fn with_healer(mut self, healer: RegionHealer) -> Self {
        self.healer = healer;
        self
    }

    pub fn labels(&self) -> &TextLabelRenderer {
        &self.labels
    }

    /// Compose `images` into `kind`. Extra images beyond the layout's need are ignored.
    pub fn compose(
        &self,
        images: &[CandidateImage],
        kind: LayoutKind,
        config: &CompositionConfig,
    ) -> Result<RgbaImage> {
        config.validate()?;
        let required = kind.required_images();
        if images.len() < required {
            return Err(LayoutError::InsufficientImages {
                layout: kind,
                required,
                supplied: images.len(),
            });
        }
        let images = &images[..required];

        let [r, g, b] = config.background_color;
        let mut surface =
            RgbaImage::from_pixel(config.output_width, config.output_height, Rgba([r, g, b, 255]));

        let sources: Vec<Cow<'_, RgbaImage>> = if config.trim_borders {
            images
                .par_iter()
                .map(|c| self.trimmer.trim(c.bitmap()))
                .collect()
        } else {
            images.iter().map(|c| Cow::Borrowed(c.bitmap())).collect()
        };

        let cells = cell_rects(kind, config.output_width, config.output_height, config.gap_px);
        for (i, cell) in cells.iter().enumerate() {
            let Some(source) = sources.get(i) else {
                continue;
            };
            let Some(render) = draw_cover(&mut surface, source, cell, CELL_FILTER) else {
                debug!(cell = i, "Skipping empty cell or source");
                continue;
            };

            if config.heal_defects {
                let defect = &images[i].defect;
                if let Some(patched) = self.healer.heal(&mut surface, defect, &render, cell) {
                    debug!(cell = i, ?patched, "Healed defect");
                }
            }
        }

        self.draw_labels(&mut surface, images, &cells, config);
        Ok(surface)
    }

    /// Compose and encode as PNG
    pub fn compose_png(
        &self,
        images: &[CandidateImage],
        kind: LayoutKind,
        config: &CompositionConfig,
    ) -> Result<Vec<u8>> {
        let surface = self.compose(images, kind, config)?;
        encode_png(&surface)
    }

    fn draw_labels(
        &self,
        surface: &mut RgbaImage,
        images: &[CandidateImage],
        cells: &[PixelRect],
        config: &CompositionConfig,
    ) {
        let wants_label = match config.label_mode {
            LabelAnchor::Center => config.global_label.is_some(),
            LabelAnchor::Corner => images.iter().any(|c| c.caption.is_some()),
        };
        if !wants_label {
            return;
        }
        if !self.labels.has_font() {
            warn!("No label font loaded; composing without labels");
            return;
        }

        match config.label_mode {
            LabelAnchor::Center => {
                if let Some(title) = &config.global_label {
                    let full = PixelRect::new(0, 0, surface.width(), surface.height());
                    self.labels
                        .draw(surface, &full, title, LabelAnchor::Center, true);
                }
            }
            LabelAnchor::Corner => {
                for (candidate, cell) in images.iter().zip(cells) {
                    if let Some(caption) = &candidate.caption {
                        self.labels
                            .draw(surface, cell, caption, LabelAnchor::Corner, false);
                    }
                }
            }
        }
    }
}

/// Encode an opaque surface as PNG (alpha dropped)
pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>> {
    let rgb: RgbImage = surface.convert();
    let mut buf = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}
