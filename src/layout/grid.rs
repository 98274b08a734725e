//! Grid cell placement
//!
//! Cells are equal-sized. With `n` cells along an axis of length `L` and gap
//! `g`, each cell spans `(L - g*(n+1)) / n`; the division remainder goes to
//! the trailing outer margin so cells, gaps and margins cover the canvas.

use super::types::LayoutKind;
use crate::geometry::PixelRect;

/// Cell rectangles for `kind`, in row-major order
pub fn cell_rects(kind: LayoutKind, width: u32, height: u32, gap: u32) -> Vec<PixelRect> {
    let (cols, rows) = kind.grid();
    let cell_w = axis_cell(width, cols, gap);
    let cell_h = axis_cell(height, rows, gap);

    let mut rects = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        for col in 0..cols {
            rects.push(PixelRect::new(
                axis_offset(col, cell_w, gap),
                axis_offset(row, cell_h, gap),
                cell_w,
                cell_h,
            ));
        }
    }
    rects
}

fn axis_cell(length: u32, count: u32, gap: u32) -> u32 {
    length.saturating_sub(gap.saturating_mul(count + 1)) / count
}

/// Leading edge of cell `index`; saturates for gaps wider than the canvas
fn axis_offset(index: u32, cell: u32, gap: u32) -> u32 {
    gap.saturating_add(index.saturating_mul(cell.saturating_add(gap)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tiles(kind: LayoutKind, width: u32, height: u32, gap: u32) {
        let rects = cell_rects(kind, width, height, gap);
        let (cols, rows) = kind.grid();
        assert_eq!(rects.len(), kind.required_images());

        for (i, a) in rects.iter().enumerate() {
            assert!(a.right() <= width && a.bottom() <= height, "{kind} cell {i} escapes");
            for b in rects.iter().skip(i + 1) {
                assert!(!a.overlaps(b), "{kind} cells overlap");
            }
        }

        // Along each axis: leading gap, cell, gap, ..., cell, trailing margin
        let first_row = &rects[..cols as usize];
        assert_eq!(first_row[0].x, gap);
        for pair in first_row.windows(2) {
            assert_eq!(pair[1].x - pair[0].right(), gap);
        }
        let trailing = width - first_row[cols as usize - 1].right();
        assert!(trailing >= gap && trailing - gap < cols);

        let first_col: Vec<_> = rects.iter().step_by(cols as usize).collect();
        assert_eq!(first_col[0].y, gap);
        for pair in first_col.windows(2) {
            assert_eq!(pair[1].y - pair[0].bottom(), gap);
        }
        let trailing = height - first_col[rows as usize - 1].bottom();
        assert!(trailing >= gap && trailing - gap < rows);
    }

    #[test]
    fn test_all_layouts_tile_default_canvas() {
        for kind in LayoutKind::all() {
            assert_tiles(kind, 2160, 3840, 0);
            assert_tiles(kind, 2160, 3840, 20);
            assert_tiles(kind, 1001, 777, 7);
        }
    }

    #[test]
    fn test_two_by_one_cells() {
        let rects = cell_rects(LayoutKind::TwoByOne, 2160, 3840, 0);
        assert_eq!(rects[0], PixelRect::new(0, 0, 1080, 3840));
        assert_eq!(rects[1], PixelRect::new(1080, 0, 1080, 3840));
    }

    #[test]
    fn test_two_by_two_with_gap() {
        let rects = cell_rects(LayoutKind::TwoByTwo, 1000, 1000, 10);
        // (1000 - 30) / 2 = 485
        assert_eq!(rects[0], PixelRect::new(10, 10, 485, 485));
        assert_eq!(rects[1], PixelRect::new(505, 10, 485, 485));
        assert_eq!(rects[2], PixelRect::new(10, 505, 485, 485));
        assert_eq!(rects[3], PixelRect::new(505, 505, 485, 485));
    }

    #[test]
    fn test_one_by_two_stacks() {
        let rects = cell_rects(LayoutKind::OneByTwo, 2160, 3840, 0);
        assert_eq!(rects[0], PixelRect::new(0, 0, 2160, 1920));
        assert_eq!(rects[1], PixelRect::new(0, 1920, 2160, 1920));
    }

    #[test]
    fn test_four_by_one_remainder_in_margin() {
        let rects = cell_rects(LayoutKind::FourByOne, 1003, 100, 0);
        assert!(rects.iter().all(|r| r.width == 250));
        assert_eq!(rects[3].right(), 1000);
    }

    #[test]
    fn test_oversized_gap_yields_empty_cells() {
        let rects = cell_rects(LayoutKind::TwoByTwo, 20, 20, 50);
        assert!(rects.iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_huge_gap_saturates() {
        for kind in LayoutKind::all() {
            for gap in [u32::MAX / 2 + 1, u32::MAX] {
                let rects = cell_rects(kind, 2160, 3840, gap);
                assert_eq!(rects.len(), kind.required_images());
                assert!(rects.iter().all(|r| r.is_empty()));
                assert!(rects.iter().all(|r| r.x >= 2160 || r.y >= 3840));
            }
        }
    }
}
