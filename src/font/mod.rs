//! Fonts and font metrics.
//!
//! Layout only ever needs three things from a font: how wide a run of text is,
//! how far the font rises above its baseline, and whether it can render a given
//! character at all. Those capabilities are captured by the [`FontMetrics`]
//! trait so that layout can be exercised against any metrics source, while
//! [`FontSet`] is the concrete pair of fonts that also knows how to embed itself
//! into the output PDF.

mod builtin;
mod truetype;

pub use builtin::*;
pub use truetype::*;

use crate::error::DocumentError;
use crate::refs::ObjectReferences;
use crate::units::Pt;
use pdf_writer::Pdf;

/// Which face of the active font family a run of text is set in
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    /// Index of the face within the document's font resources (`/F0`, `/F1`)
    pub fn index(self) -> usize {
        match self {
            FontWeight::Regular => 0,
            FontWeight::Bold => 1,
        }
    }
}

/// The glyph-width capability layout consumes. Implementations must be pure:
/// the same query always yields the same answer.
pub trait FontMetrics {
    /// The advance width of `text` when set in `weight` at `size`
    fn width_of_text(&self, weight: FontWeight, text: &str, size: Pt) -> Result<Pt, DocumentError>;

    /// Distance from the top of a line box to the text baseline
    fn ascent(&self, weight: FontWeight, size: Pt) -> Pt;

    /// Whether the face can render `ch` without falling back to a placeholder
    fn supports(&self, weight: FontWeight, ch: char) -> bool;
}

/// A single face, either one of the standard PDF fonts every viewer ships with
/// or a TrueType/OpenType font that gets embedded in the output.
pub enum Font {
    Builtin(BuiltinFont),
    TrueType(TrueTypeFont),
}

impl Font {
    pub fn width_of_text(&self, text: &str, size: Pt) -> Result<Pt, DocumentError> {
        match self {
            Font::Builtin(font) => font.width_of_text(text, size),
            Font::TrueType(font) => font.width_of_text(text, size),
        }
    }

    pub fn ascent(&self, size: Pt) -> Pt {
        match self {
            Font::Builtin(font) => font.ascent(size),
            Font::TrueType(font) => font.ascent(size),
        }
    }

    pub fn supports(&self, ch: char) -> bool {
        match self {
            Font::Builtin(font) => font.supports(ch),
            Font::TrueType(font) => font.glyph_id(ch).is_some(),
        }
    }

    /// Encode text into the byte string a content stream's `Tj` operator expects
    /// for this font. Characters the font can't render encode as its `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Font::Builtin(font) => font.encode(text),
            Font::TrueType(font) => font.encode(text),
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        match self {
            Font::Builtin(font) => font.write(refs, font_index, writer),
            Font::TrueType(font) => font.write(refs, font_index, writer),
        }
    }
}

/// The regular and bold faces a document is set in
pub struct FontSet {
    pub regular: Font,
    pub bold: Font,
}

impl FontSet {
    /// Helvetica and Helvetica-Bold, which need no embedding
    pub fn helvetica() -> FontSet {
        FontSet {
            regular: Font::Builtin(BuiltinFont::Helvetica),
            bold: Font::Builtin(BuiltinFont::HelveticaBold),
        }
    }

    /// Load a pair of TrueType/OpenType fonts to embed
    pub fn truetype(regular: Vec<u8>, bold: Vec<u8>) -> Result<FontSet, DocumentError> {
        Ok(FontSet {
            regular: Font::TrueType(TrueTypeFont::load(regular)?),
            bold: Font::TrueType(TrueTypeFont::load(bold)?),
        })
    }

    pub fn face(&self, weight: FontWeight) -> &Font {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }

    /// Faces in resource order, paired with the weight they serve
    pub fn faces(&self) -> [(FontWeight, &Font); 2] {
        [
            (FontWeight::Regular, &self.regular),
            (FontWeight::Bold, &self.bold),
        ]
    }
}

impl Default for FontSet {
    fn default() -> Self {
        FontSet::helvetica()
    }
}

impl FontMetrics for FontSet {
    fn width_of_text(&self, weight: FontWeight, text: &str, size: Pt) -> Result<Pt, DocumentError> {
        self.face(weight).width_of_text(text, size)
    }

    fn ascent(&self, weight: FontWeight, size: Pt) -> Pt {
        self.face(weight).ascent(size)
    }

    fn supports(&self, weight: FontWeight, ch: char) -> bool {
        self.face(weight).supports(ch)
    }
}

impl<M: FontMetrics + ?Sized> FontMetrics for &M {
    fn width_of_text(&self, weight: FontWeight, text: &str, size: Pt) -> Result<Pt, DocumentError> {
        (**self).width_of_text(weight, text, size)
    }

    fn ascent(&self, weight: FontWeight, size: Pt) -> Pt {
        (**self).ascent(weight, size)
    }

    fn supports(&self, weight: FontWeight, ch: char) -> bool {
        (**self).supports(weight, ch)
    }
}
