//! Region Healer
//!
//! Cosmetic fill for small defect regions (typically a corner watermark over
//! plain background). Not content-aware inpainting.
//!
//! # Algorithm
//!
//! 1. Map the permille box through the render rectangle into surface pixels
//! 2. Pad, then clamp to the drawn rectangle and its clip cell
//! 3. Stretch the 1px strips just outside each padded edge across the patch
//!    (top opaque, bottom/left/right at partial opacity)
//! 4. Gaussian blur the patch
//! 5. Add uniform noise so the fill is not visibly flat
//! 6. Alpha-composite the patch back onto the surface

use image::{imageops, Rgba, RgbaImage};
use rand::Rng;

use super::types::{DefectBox, HealOptions, PERMILLE};
use crate::geometry::{PixelRect, RenderRect};

/// Edge-stretch healer
#[derive(Debug, Clone, Default)]
pub struct RegionHealer {
    options: HealOptions,
}

impl RegionHealer {
    /// Create a healer with the given options
    pub fn new(options: HealOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HealOptions {
        &self.options
    }

    /// Heal using the thread-local RNG
    pub fn heal(
        &self,
        surface: &mut RgbaImage,
        defect: &DefectBox,
        render: &RenderRect,
        clip: &PixelRect,
    ) -> Option<PixelRect> {
        self.heal_with_rng(surface, defect, render, clip, &mut rand::rng())
    }

    /// Heal a defect drawn at `render`, never touching pixels outside `clip`.
    ///
    /// Returns the patched rectangle, or `None` when nothing was changed.
    pub fn heal_with_rng<R: Rng + ?Sized>(
        &self,
        surface: &mut RgbaImage,
        defect: &DefectBox,
        render: &RenderRect,
        clip: &PixelRect,
        rng: &mut R,
    ) -> Option<PixelRect> {
        let target = self.patch_rect(surface, defect, render, clip)?;

        let mut patch = self.stretch_edges(surface, &target);

        if self.options.blur_sigma > 0.0 {
            patch = imageproc::filter::gaussian_blur_f32(&patch, self.options.blur_sigma);
        }

        if self.options.noise_amplitude > 0.0 {
            add_uniform_noise(&mut patch, self.options.noise_amplitude, rng);
        }

        imageops::overlay(surface, &patch, target.x as i64, target.y as i64);
        Some(target)
    }

    /// Compute the padded, clamped patch rectangle in surface pixels
    pub fn patch_rect(
        &self,
        surface: &RgbaImage,
        defect: &DefectBox,
        render: &RenderRect,
        clip: &PixelRect,
    ) -> Option<PixelRect> {
        let b = defect.validated()?;
        let scale = PERMILLE as f64;
        let pad = self.options.pad as f64;

        let x = render.x + (b.xmin as f64 / scale) * render.width;
        let y = render.y + (b.ymin as f64 / scale) * render.height;
        let w = ((b.xmax - b.xmin) as f64 / scale) * render.width;
        let h = ((b.ymax - b.ymin) as f64 / scale) * render.height;

        let min_x = render.x.max(clip.x as f64).max(0.0);
        let min_y = render.y.max(clip.y as f64).max(0.0);
        let max_x = render
            .right()
            .min(clip.right() as f64)
            .min(surface.width() as f64);
        let max_y = render
            .bottom()
            .min(clip.bottom() as f64)
            .min(surface.height() as f64);

        let tx = (x - pad).max(min_x).floor();
        let ty = (y - pad).max(min_y).floor();
        let tw = (max_x - tx).min(w + pad * 2.0).floor();
        let th = (max_y - ty).min(h + pad * 2.0).floor();

        if tw < 1.0 || th < 1.0 {
            return None;
        }

        Some(PixelRect::new(tx as u32, ty as u32, tw as u32, th as u32))
    }

    /// Build the patch from the four surrounding 1px strips
    fn stretch_edges(&self, surface: &RgbaImage, target: &PixelRect) -> RgbaImage {
        let (sw, sh) = surface.dimensions();
        let mut patch = RgbaImage::new(target.width, target.height);
        let edge_alpha = self.options.edge_alpha;

        // Top strip, opaque
        if target.y >= 1 {
            let row = target.y - 1;
            for (px, _, p) in patch.enumerate_pixels_mut() {
                blend_over(p, surface.get_pixel(target.x + px, row), 1.0);
            }
        }

        // Bottom strip
        if target.bottom() < sh {
            let row = target.bottom();
            for (px, _, p) in patch.enumerate_pixels_mut() {
                blend_over(p, surface.get_pixel(target.x + px, row), edge_alpha);
            }
        }

        // Left strip
        if target.x >= 1 {
            let col = target.x - 1;
            for (_, py, p) in patch.enumerate_pixels_mut() {
                blend_over(p, surface.get_pixel(col, target.y + py), edge_alpha);
            }
        }

        // Right strip
        if target.right() < sw {
            let col = target.right();
            for (_, py, p) in patch.enumerate_pixels_mut() {
                blend_over(p, surface.get_pixel(col, target.y + py), edge_alpha);
            }
        }

        patch
    }
}

/// Source-over blend of `src` scaled by `opacity` onto `dst`
fn blend_over(dst: &mut Rgba<u8>, src: &Rgba<u8>, opacity: f32) {
    let sa = (src.0[3] as f32 / 255.0) * opacity;
    if sa <= 0.0 {
        return;
    }
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let s = src.0[c] as f32;
        let d = dst.0[c] as f32;
        let v = (s * sa + d * da * (1.0 - sa)) / out_a;
        dst.0[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Add one uniform sample in +/- amplitude/2 to every RGB channel of each pixel
fn add_uniform_noise<R: Rng + ?Sized>(patch: &mut RgbaImage, amplitude: f32, rng: &mut R) {
    let half = amplitude / 2.0;
    for p in patch.pixels_mut() {
        let noise: f32 = rng.random_range(-half..=half);
        for c in 0..3 {
            p.0[c] = (p.0[c] as f32 + noise).round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn surface_with_logo() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(200, 200, GRAY);
        for y in 150..170 {
            for x in 150..180 {
                img.put_pixel(x, y, BLACK);
            }
        }
        img
    }

    fn full_rect() -> (RenderRect, PixelRect) {
        (
            RenderRect::new(0.0, 0.0, 200.0, 200.0),
            PixelRect::new(0, 0, 200, 200),
        )
    }

    #[test]
    fn test_absent_defect_is_noop() {
        let mut img = surface_with_logo();
        let original = img.clone();
        let (render, clip) = full_rect();
        let mut rng = StdRng::seed_from_u64(7);

        let result = RegionHealer::default().heal_with_rng(
            &mut img,
            &DefectBox::absent(),
            &render,
            &clip,
            &mut rng,
        );

        assert!(result.is_none());
        assert_eq!(img, original);
    }

    #[test]
    fn test_degenerate_defect_is_noop() {
        let mut img = surface_with_logo();
        let original = img.clone();
        let (render, clip) = full_rect();
        let mut rng = StdRng::seed_from_u64(7);

        let result = RegionHealer::default().heal_with_rng(
            &mut img,
            &DefectBox::new(750, 750, 750, 900),
            &render,
            &clip,
            &mut rng,
        );

        assert!(result.is_none());
        assert_eq!(img, original);
    }

    #[test]
    fn test_patch_rect_padding_and_clamp() {
        let img = surface_with_logo();
        let (render, clip) = full_rect();
        let healer = RegionHealer::default();

        let rect = healer
            .patch_rect(&img, &DefectBox::new(750, 750, 900, 850), &render, &clip)
            .unwrap();
        assert_eq!(rect, PixelRect::new(135, 135, 60, 50));

        // Box touching the bottom-right corner is clamped to the drawn area
        let rect = healer
            .patch_rect(&img, &DefectBox::new(950, 950, 1000, 1000), &render, &clip)
            .unwrap();
        assert_eq!(rect.right(), 200);
        assert_eq!(rect.bottom(), 200);
    }

    #[test]
    fn test_patch_rect_respects_clip_cell() {
        let img = RgbaImage::from_pixel(200, 200, GRAY);
        // Render overflows the cell on the left (cover crop)
        let render = RenderRect::new(-50.0, 0.0, 300.0, 200.0);
        let clip = PixelRect::new(0, 0, 100, 200);
        let rect = RegionHealer::default()
            .patch_rect(&img, &DefectBox::new(0, 0, 100, 100), &render, &clip)
            .unwrap();
        assert_eq!(rect.x, 0);
        assert!(rect.right() <= 100);
    }

    #[test]
    fn test_heal_removes_logo_on_uniform_background() {
        let mut img = surface_with_logo();
        let (render, clip) = full_rect();
        let mut rng = StdRng::seed_from_u64(42);

        let healed = RegionHealer::default()
            .heal_with_rng(
                &mut img,
                &DefectBox::new(750, 750, 900, 850),
                &render,
                &clip,
                &mut rng,
            )
            .unwrap();

        for y in healed.y..healed.bottom() {
            for x in healed.x..healed.right() {
                let p = img.get_pixel(x, y);
                for c in 0..3 {
                    assert!(
                        (p.0[c] as i32 - 128).abs() <= 8,
                        "pixel ({x},{y}) = {:?}",
                        p
                    );
                }
            }
        }
    }

    #[test]
    fn test_heal_leaves_outside_untouched() {
        let mut img = surface_with_logo();
        let original = img.clone();
        let (render, clip) = full_rect();
        let mut rng = StdRng::seed_from_u64(1);

        let healed = RegionHealer::default()
            .heal_with_rng(
                &mut img,
                &DefectBox::new(750, 750, 900, 850),
                &render,
                &clip,
                &mut rng,
            )
            .unwrap();

        for (x, y, p) in img.enumerate_pixels() {
            if !healed.contains(x, y) {
                assert_eq!(p, original.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_flat_heal_is_deterministic() {
        let (render, clip) = full_rect();
        let healer = RegionHealer::new(HealOptions::flat());
        let defect = DefectBox::new(750, 750, 900, 850);

        let mut a = surface_with_logo();
        let mut b = surface_with_logo();
        healer.heal_with_rng(&mut a, &defect, &render, &clip, &mut StdRng::seed_from_u64(1));
        healer.heal_with_rng(&mut b, &defect, &render, &clip, &mut StdRng::seed_from_u64(2));
        assert_eq!(a, b);
        assert_eq!(*a.get_pixel(160, 160), GRAY);
    }

    #[test]
    fn test_blend_over() {
        let mut dst = Rgba([0, 0, 0, 0]);
        blend_over(&mut dst, &Rgba([200, 100, 50, 255]), 1.0);
        assert_eq!(dst, Rgba([200, 100, 50, 255]));

        let mut dst = Rgba([0, 0, 0, 255]);
        blend_over(&mut dst, &Rgba([200, 200, 200, 255]), 0.5);
        assert_eq!(dst, Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn test_noise_stays_in_band() {
        let mut patch = RgbaImage::from_pixel(20, 20, Rgba([250, 3, 128, 255]));
        let mut rng = StdRng::seed_from_u64(3);
        add_uniform_noise(&mut patch, 15.0, &mut rng);
        for p in patch.pixels() {
            assert!(p.0[0] >= 242);
            assert!(p.0[1] <= 11);
            assert!((p.0[2] as i32 - 128).abs() <= 8);
            assert_eq!(p.0[3], 255);
        }
    }
}
