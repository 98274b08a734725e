//! Text Label Renderer
//!
//! Draws a caption on a semi-transparent dark rounded background, scaled
//! linearly with output width.

use image::{imageops, GenericImage, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

use super::font::LabelFont;
use super::types::{
    LabelAnchor, LabelGeometry, BACKGROUND_OPACITY, CELL_FONT_SIZE, CORNER_MARGIN, CORNER_RADIUS,
    LABEL_PADDING, REFERENCE_WIDTH, TITLE_FONT_SIZE,
};
use crate::geometry::PixelRect;

const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BACKGROUND_COLOR: [u8; 3] = [0, 0, 0];

/// Label renderer; without a font every draw is a no-op
#[derive(Debug, Clone, Default)]
pub struct TextLabelRenderer {
    font: Option<LabelFont>,
}

impl TextLabelRenderer {
    pub fn new(font: Option<LabelFont>) -> Self {
        Self { font }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn font(&self) -> Option<&LabelFont> {
        self.font.as_ref()
    }

    /// Font pixel size for an output of `output_width`
    pub fn font_size(output_width: u32, is_title: bool) -> f32 {
        let base = if is_title {
            TITLE_FONT_SIZE
        } else {
            CELL_FONT_SIZE
        };
        base * output_width as f32 / REFERENCE_WIDTH
    }

    /// Place a label of measured `text_width` inside `rect`
    pub fn geometry(
        output_width: u32,
        rect: &PixelRect,
        text_width: f32,
        anchor: LabelAnchor,
        is_title: bool,
    ) -> LabelGeometry {
        let scale = output_width as f32 / REFERENCE_WIDTH;
        let font_size = Self::font_size(output_width, is_title);
        let padding = LABEL_PADDING * scale;
        let box_width = text_width + padding * 2.0;
        let box_height = font_size + padding;

        let (x, y, w, h) = (
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        );

        let (box_x, baseline) = match anchor {
            LabelAnchor::Center => ((x + (w - box_width) / 2.0), y + h / 2.0 + font_size / 3.0),
            LabelAnchor::Corner => (
                x + CORNER_MARGIN * scale,
                y + h - CORNER_MARGIN * scale - padding,
            ),
        };

        LabelGeometry {
            font_size,
            box_x,
            box_y: baseline - font_size,
            box_width,
            box_height,
            radius: CORNER_RADIUS * scale,
            text_x: box_x + padding,
            baseline,
        }
    }

    /// Draw `text` inside `rect`, clipped to it. Returns whether anything was drawn.
    pub fn draw(
        &self,
        surface: &mut RgbaImage,
        rect: &PixelRect,
        text: &str,
        anchor: LabelAnchor,
        is_title: bool,
    ) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let Some(font) = &self.font else {
            return false;
        };

        let clip = clip_to(surface, rect);
        if clip.is_empty() {
            return false;
        }

        let font_size = Self::font_size(surface.width(), is_title);
        let text_width = font.text_width(text, font_size);
        let geom = Self::geometry(surface.width(), rect, text_width, anchor, is_title);

        let mut view = imageops::crop(surface, clip.x, clip.y, clip.width, clip.height);
        let (ox, oy) = (clip.x as f32, clip.y as f32);

        fill_rounded_rect(
            &mut *view,
            geom.box_x - ox,
            geom.box_y - oy,
            geom.box_width,
            geom.box_height,
            geom.radius,
            BACKGROUND_COLOR,
            BACKGROUND_OPACITY,
        );

        let top = geom.baseline - font.ascent(geom.font_size);
        draw_text_mut(
            &mut *view,
            TEXT_COLOR,
            (geom.text_x - ox).round() as i32,
            (top - oy).round() as i32,
            geom.font_size,
            font.font(),
            text,
        );

        true
    }
}

fn clip_to(surface: &RgbaImage, rect: &PixelRect) -> PixelRect {
    let x = rect.x.min(surface.width());
    let y = rect.y.min(surface.height());
    let right = rect.right().min(surface.width());
    let bottom = rect.bottom().min(surface.height());
    PixelRect::new(x, y, right - x, bottom - y)
}

/// Blend a rounded rectangle of `color` at `opacity` onto `img`
#[allow(clippy::too_many_arguments)]
fn fill_rounded_rect<I>(
    img: &mut I,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    radius: f32,
    color: [u8; 3],
    opacity: f32,
) where
    I: GenericImage<Pixel = Rgba<u8>>,
{
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    let x0 = x.floor().max(0.0) as u32;
    let y0 = y.floor().max(0.0) as u32;
    let x1 = ((x + w).ceil().max(0.0) as u32).min(img.width());
    let y1 = ((y + h).ceil().max(0.0) as u32).min(img.height());

    for py in y0..y1 {
        for px in x0..x1 {
            let cx = px as f32 + 0.5;
            let cy = py as f32 + 0.5;
            if cx < x || cx > x + w || cy < y || cy > y + h {
                continue;
            }
            let dx = if cx < x + r {
                x + r - cx
            } else if cx > x + w - r {
                cx - (x + w - r)
            } else {
                0.0
            };
            let dy = if cy < y + r {
                y + r - cy
            } else if cy > y + h - r {
                cy - (y + h - r)
            } else {
                0.0
            };
            if dx * dx + dy * dy > r * r {
                continue;
            }

            let mut p = img.get_pixel(px, py);
            for c in 0..3 {
                let v = p.0[c] as f32 * (1.0 - opacity) + color[c] as f32 * opacity;
                p.0[c] = v.round().clamp(0.0, 255.0) as u8;
            }
            let a = p.0[3] as f32 / 255.0;
            p.0[3] = ((opacity + a * (1.0 - opacity)) * 255.0).round() as u8;
            img.put_pixel(px, py, p);
        }
    }
}
