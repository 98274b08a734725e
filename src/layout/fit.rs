//! Cover-fit placement
//!
//! Scales a source uniformly so it fully covers a destination rectangle,
//! centered, with the overflow clipped. Used by both the grid compositor and
//! the cover generator.

use image::{imageops, imageops::FilterType, RgbaImage};

use crate::geometry::{PixelRect, RenderRect};

/// Resolved cover-fit of one source into one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    /// Uniform scale factor applied to the source
    pub scale: f64,
    /// Where the whole scaled source lands (may overflow the cell)
    pub render: RenderRect,
    /// Source window that remains visible inside the cell
    pub source_window: PixelRect,
}

impl CoverFit {
    /// Compute the fit, or `None` if either side has zero area
    pub fn compute(source_width: u32, source_height: u32, cell: &PixelRect) -> Option<Self> {
        if source_width == 0 || source_height == 0 || cell.is_empty() {
            return None;
        }
        let (sw, sh) = (source_width as f64, source_height as f64);
        let (cw, ch) = (cell.width as f64, cell.height as f64);

        let scale = (cw / sw).max(ch / sh);
        let (rw, rh) = (sw * scale, sh * scale);
        let render = RenderRect::new(
            cell.x as f64 + (cw - rw) / 2.0,
            cell.y as f64 + (ch - rh) / 2.0,
            rw,
            rh,
        );

        let visible_w = (cw / scale).round().clamp(1.0, sw) as u32;
        let visible_h = (ch / scale).round().clamp(1.0, sh) as u32;
        let source_window = PixelRect::new(
            (source_width - visible_w) / 2,
            (source_height - visible_h) / 2,
            visible_w,
            visible_h,
        );

        Some(Self {
            scale,
            render,
            source_window,
        })
    }
}

/// Draw `source` into `cell` on `surface` with cover-fit, alpha-compositing
/// over what is already there. Returns the render rectangle.
pub fn draw_cover(
    surface: &mut RgbaImage,
    source: &RgbaImage,
    cell: &PixelRect,
    filter: FilterType,
) -> Option<RenderRect> {
    let fit = CoverFit::compute(source.width(), source.height(), cell)?;
    let w = &fit.source_window;

    let window = imageops::crop_imm(source, w.x, w.y, w.width, w.height).to_image();
    let scaled = if window.dimensions() == (cell.width, cell.height) {
        window
    } else {
        imageops::resize(&window, cell.width, cell.height, filter)
    };
    imageops::overlay(surface, &scaled, cell.x as i64, cell.y as i64);

    Some(fit.render)
}
