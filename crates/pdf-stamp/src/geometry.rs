//! Conversion between the scaled, top-left-origin preview space a position is
//! captured in and the bottom-left-origin page space the stamp is drawn in.

use crate::types::Orientation;

/// US Letter in points.
pub const LETTER_WIDTH_PT: f64 = 612.0;
pub const LETTER_HEIGHT_PT: f64 = 792.0;

/// Real page dimensions `(width, height)` for an orientation, in points.
pub fn page_dimensions(orientation: Orientation) -> (f64, f64) {
    match orientation {
        Orientation::Portrait => (LETTER_WIDTH_PT, LETTER_HEIGHT_PT),
        Orientation::Landscape => (LETTER_HEIGHT_PT, LETTER_WIDTH_PT),
    }
}

/// Convert a preview-space position (origin top-left, y down, at `scale`
/// relative to the real page) into real page coordinates (origin bottom-left,
/// y up, unscaled).
///
/// This is the single place where the previewed position and the printed
/// position are reconciled; the only rounding is the final truncation to
/// whole page units.
pub fn to_real_coordinates(
    preview_x: f64,
    preview_y: f64,
    preview_height: f64,
    scale: f64,
) -> (f64, f64) {
    let real_x = preview_x / scale;
    let real_y = (preview_height - preview_y) / scale;
    (real_x.trunc(), real_y.trunc())
}

/// The scaled canvas a drag position is captured in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewSpace {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl PreviewSpace {
    /// Preview canvas for a letter page in the given orientation, with
    /// dimensions truncated to whole pixels as a display canvas would be.
    pub fn for_page(orientation: Orientation, scale: f64) -> Self {
        let (width, height) = page_dimensions(orientation);
        Self {
            width: (width * scale).trunc(),
            height: (height * scale).trunc(),
            scale,
        }
    }

    /// Clamp a captured point into the canvas, then convert to real page
    /// coordinates. The clamp matches the drag handler: a pointer can never
    /// place the anchor outside the preview.
    pub fn to_real(&self, x: f64, y: f64) -> (f64, f64) {
        let x = x.clamp(0.0, self.width);
        let y = y.clamp(0.0, self.height);
        to_real_coordinates(x, y, self.height, self.scale)
    }
}

/// Keep the stamp's visual band inside the page's top and bottom edges.
///
/// The band is approximated as `0.8 × size` above the baseline and
/// `0.2 × size` below it. Positions near an edge are silently relocated;
/// no error is raised.
pub fn clamp_baseline(y: f64, font_size: f64, page_height: f64) -> f64 {
    let ascent = font_size * 0.8;
    let descent = font_size * 0.2;
    if y + ascent > page_height {
        page_height - ascent
    } else if y - descent < 0.0 {
        descent
    } else {
        y
    }
}
