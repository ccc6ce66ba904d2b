//! Advance widths for the built-in Helvetica-Bold font, in 1/1000 em units.
//! This is the string-width primitive the overlay uses to center text and
//! size underlines.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Width used for characters outside the table (Helvetica-Bold's default).
const DEFAULT_WIDTH: u16 = 611;

lazy_static! {
    static ref HELVETICA_BOLD_WIDTHS: HashMap<char, u16> = {
        let widths: &[(char, u16)] = &[
            (' ', 278), ('!', 333), ('"', 474), ('#', 556), ('$', 556), ('%', 889),
            ('&', 722), ('\'', 238), ('(', 333), (')', 333), ('*', 389), ('+', 584),
            (',', 278), ('-', 333), ('.', 278), ('/', 278), ('0', 556), ('1', 556),
            ('2', 556), ('3', 556), ('4', 556), ('5', 556), ('6', 556), ('7', 556),
            ('8', 556), ('9', 556), (':', 333), (';', 333), ('<', 584), ('=', 584),
            ('>', 584), ('?', 611), ('@', 975), ('A', 722), ('B', 722), ('C', 722),
            ('D', 722), ('E', 667), ('F', 611), ('G', 778), ('H', 722), ('I', 278),
            ('J', 556), ('K', 722), ('L', 611), ('M', 833), ('N', 722), ('O', 778),
            ('P', 667), ('Q', 778), ('R', 722), ('S', 667), ('T', 611), ('U', 722),
            ('V', 667), ('W', 944), ('X', 667), ('Y', 667), ('Z', 611), ('[', 333),
            ('\\', 278), (']', 333), ('^', 584), ('_', 556), ('`', 333), ('a', 556),
            ('b', 611), ('c', 556), ('d', 611), ('e', 556), ('f', 333), ('g', 611),
            ('h', 611), ('i', 278), ('j', 278), ('k', 556), ('l', 278), ('m', 889),
            ('n', 611), ('o', 611), ('p', 611), ('q', 611), ('r', 389), ('s', 556),
            ('t', 333), ('u', 611), ('v', 556), ('w', 778), ('x', 556), ('y', 556),
            ('z', 500), ('{', 389), ('|', 280), ('}', 389), ('~', 584),
        ];
        widths.iter().copied().collect()
    };
}

fn char_width(ch: char) -> u16 {
    HELVETICA_BOLD_WIDTHS
        .get(&ch)
        .copied()
        .unwrap_or(DEFAULT_WIDTH)
}

/// Measured width of `text` in Helvetica-Bold at `font_size`, in points.
pub fn string_width(text: &str, font_size: f64) -> f64 {
    let units: u32 = text.chars().map(|ch| char_width(ch) as u32).sum();
    units as f64 / 1000.0 * font_size
}
