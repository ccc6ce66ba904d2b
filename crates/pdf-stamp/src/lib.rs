mod compositor;
mod geometry;
mod metrics;
mod overlay;
mod types;

pub use compositor::{composite, stamp_document};
pub use geometry::{
    LETTER_HEIGHT_PT, LETTER_WIDTH_PT, PreviewSpace, clamp_baseline, page_dimensions,
    to_real_coordinates,
};
pub use metrics::string_width;
pub use overlay::{STAMP_FONT, build_overlay};
pub use types::*;
