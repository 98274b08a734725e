//! Text label module
//!
//! Caption overlays for collage cells (corner anchor) and the single centered
//! title label. Font sizes scale with output width relative to a 1200px
//! reference, so the same settings read alike at every output resolution.

mod font;
mod renderer;
mod types;

pub use font::LabelFont;
pub use renderer::TextLabelRenderer;
pub use types::{
    LabelAnchor, LabelError, LabelGeometry, Result, CELL_FONT_SIZE, REFERENCE_WIDTH,
    SYSTEM_FONT_CANDIDATES, TITLE_FONT_SIZE,
};
