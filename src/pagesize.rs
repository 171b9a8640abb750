//! Pre-defined page sizes for common paper formats.
//!
//! All sizes are provided in portrait orientation (width, height) where width ≤ height.
//! A layout config turns them with its `orientation` field, which goes through
//! the [`PageOrientation`](crate::pagesize::PageOrientation) trait.
//!
//! # Example
//!
//! ```
//! use prospectus::pagesize::{self, Orientation};
//!
//! let page_size = pagesize::by_name("a4").expect("a4 is a known size");
//! let landscape = Orientation::Landscape.apply(page_size);
//! assert!(landscape.0 > landscape.1);
//! ```

use crate::units::*;
use serde::Deserialize;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

// north american sizes
pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const HALF_LETTER: PageSize = (Pt(5.5 * 72.0), Pt(8.5 * 72.0));
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(14.0 * 72.0));
pub const TABLOID: PageSize = (Pt(11.0 * 72.0), Pt(17.0 * 72.0));

// iso a-series (converted from mm to points)
pub const A3: PageSize = (Pt(297.0 * 72.0 / 25.4), Pt(420.0 * 72.0 / 25.4));
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));

/// Look up a page size by its conventional name, case-insensitively. Used when
/// page sizes come from a layout config file.
pub fn by_name(name: &str) -> Option<PageSize> {
    match name.trim().to_ascii_lowercase().as_str() {
        "letter" | "us-letter" => Some(LETTER),
        "half-letter" | "statement" => Some(HALF_LETTER),
        "legal" => Some(LEGAL),
        "tabloid" => Some(TABLOID),
        "a3" => Some(A3),
        "a4" => Some(A4),
        "a5" => Some(A5),
        _ => None,
    }
}

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// Returns the size in portrait orientation (width ≤ height).
    fn portrait(self) -> Self;
    /// Returns the size in landscape orientation (width ≥ height).
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}

/// Which way up a page is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn apply(self, size: PageSize) -> PageSize {
        match self {
            Orientation::Portrait => size.portrait(),
            Orientation::Landscape => size.landscape(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(by_name("Letter"), Some(LETTER));
        assert_eq!(by_name(" A4 "), Some(A4));
        assert_eq!(by_name("b5"), None);
    }

    #[test]
    fn orientation_swaps_only_when_needed() {
        assert_eq!(LETTER.portrait(), LETTER);
        assert_eq!(LETTER.landscape(), (LETTER.1, LETTER.0));
        assert_eq!(LETTER.landscape().portrait(), LETTER);
        assert_eq!(Orientation::Landscape.apply(A4), (A4.1, A4.0));
        assert_eq!(Orientation::Portrait.apply((A4.1, A4.0)), A4);
    }
}
