use crate::{
    error::DocumentError,
    refs::{ObjectReferences, RefType},
    units::Pt,
};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::{BTreeMap, HashMap};

/// A parsed TrueType/OpenType font. The font is embedded in its entirety as a
/// CID-keyed font, so large fonts noticeably increase the size of the output.
///
/// Loading fails unless the font maps `?`, since that glyph stands in for any
/// character the font can't render.
pub struct TrueTypeFont {
    pub face: OwnedFace,
}

impl TrueTypeFont {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed or lacks the placeholder glyph
    pub fn load(bytes: Vec<u8>) -> Result<TrueTypeFont, DocumentError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        let font = TrueTypeFont { face };

        if font.glyph_id('?').is_none() {
            return Err(DocumentError::FontEmbedding(
                "font has no glyph for the '?' placeholder".to_string(),
            ));
        }
        if font.face.as_face_ref().tables().cmap.is_none() {
            return Err(DocumentError::FontEmbedding(
                "font has no character map".to_string(),
            ));
        }

        Ok(font)
    }

    fn units_per_em(&self) -> f32 {
        self.face.as_face_ref().units_per_em() as f32
    }

    /// Obtain the full name of the font, falling back to the family name
    pub fn name(&self) -> String {
        self.name_entry(owned_ttf_parser::name_id::POST_SCRIPT_NAME)
            .or_else(|| self.name_entry(owned_ttf_parser::name_id::FULL_NAME))
            .or_else(|| self.name_entry(owned_ttf_parser::name_id::FAMILY))
            .unwrap_or_else(|| "EmbeddedFont".to_string())
    }

    /// Obtain the family name of the font
    pub fn family(&self) -> String {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
            .unwrap_or_else(|| self.name())
    }

    fn name_entry(&self, id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        size * (self.face.as_face_ref().ascender() as f32 / self.units_per_em())
    }

    /// Calculate the width of a given string of text at the given size. Characters
    /// without a glyph are measured as the `?` that will be drawn in their place.
    pub fn width_of_text(&self, text: &str, size: Pt) -> Result<Pt, DocumentError> {
        let face = self.face.as_face_ref();
        let mut units: u32 = 0;
        for ch in text.chars() {
            let gid = self.glyph_id_or_placeholder(ch);
            let advance = face.glyph_hor_advance(GlyphId(gid)).ok_or_else(|| {
                DocumentError::FontEmbedding(format!("font has no advance width for {ch:?}"))
            })?;
            units += advance as u32;
        }
        Ok(size * (units as f32 / self.units_per_em()))
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|i| i.0)
    }

    fn glyph_id_or_placeholder(&self, ch: char) -> u16 {
        // load() guarantees '?' is present
        self.glyph_id(ch)
            .or_else(|| self.glyph_id('?'))
            .unwrap_or_default()
    }

    /// Encode as big-endian glyph ids, matching the Identity-H encoding the font is written with
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .flat_map(|ch| self.glyph_id_or_placeholder(ch).to_be_bytes())
            .collect()
    }

    fn write_cid(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let font_descriptor_id = self.write_descriptor(refs, font_index, writer);

        let id = refs.gen(RefType::CidFont(font_index));

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(self.name().as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(font_descriptor_id);

        let advances = self.glyph_advances();
        let scaling = 1000.0 / self.units_per_em();

        // the most frequent advance becomes the default width
        let mut width_counts: HashMap<u16, usize> = HashMap::new();
        for &width in advances.values() {
            *width_counts.entry(width).or_insert(0) += 1;
        }
        let most_common_width = width_counts
            .iter()
            .max_by_key(|&(_, count)| *count)
            .map(|(&width, _)| width as f32 * scaling)
            .unwrap_or(1000.0);

        // group consecutive glyph ids into runs for the /W array
        let mut runs: Vec<(u16, Vec<f32>)> = Vec::new();
        for (&gid, &width) in advances.iter() {
            let width = width as f32 * scaling;
            let extends_run = runs
                .last()
                .is_some_and(|(start, run)| *start as usize + run.len() == gid as usize);
            match runs.last_mut() {
                Some((_, run)) if extends_run => run.push(width),
                _ => runs.push((gid, vec![width])),
            }
        }

        let mut widths = cid_font.widths();
        for (start, run) in runs {
            widths.consecutive(start, run);
        }
        widths.finish();

        cid_font.default_width(most_common_width);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_font_data(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::FontData(font_index));

        let data = self.face.as_slice();
        let compressed = compress_to_vec_zlib(data, CompressionLevel::DefaultCompression as u8);
        writer
            .stream(id, compressed.as_slice())
            .filter(Filter::FlateDecode)
            .pair(Name(b"Length1"), data.len() as i32);

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let font_data_stream_id = self.write_font_data(refs, font_index, writer);

        let face = self.face.as_face_ref();
        let advances = self.glyph_advances();
        let max_width = advances.values().copied().max().unwrap_or_default();
        let sum_width: u64 = advances.values().map(|&w| w as u64).sum();
        let avg_width = sum_width as f32 / advances.len().max(1) as f32;

        let id = refs.gen(RefType::FontDescriptor(font_index));

        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(self.name().as_bytes()));
        descriptor.family(Str(self.family().as_bytes()));
        descriptor.weight(face.weight().to_number());

        let mut flags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.insert(FontFlags::FIXED_PITCH);
        }
        if face.is_italic() {
            flags.insert(FontFlags::ITALIC);
        }
        descriptor.flags(flags);

        let scaling = 1000.0 / self.units_per_em();
        let bbox = face.global_bounding_box();
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        let cap_height = face.capital_height().unwrap_or(face.ascender());
        descriptor.cap_height(cap_height as f32 * scaling);
        descriptor.x_height(face.x_height().unwrap_or(cap_height) as f32 * scaling);
        // no reliable source for the dominant stem width in the font tables
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width * scaling);
        descriptor.max_width(max_width as f32 * scaling);
        descriptor.missing_width(max_width as f32 * scaling);

        descriptor.font_file2(font_data_stream_id);

        id
    }

    /// Map of glyph id to the first unicode character that maps to it
    fn glyph_chars(&self) -> BTreeMap<u16, char> {
        let mut map: BTreeMap<u16, char> = BTreeMap::new();

        let Some(cmap) = self.face.as_face_ref().tables().cmap else {
            return map;
        };
        for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
            subtable.codepoints(|codepoint: u32| {
                if let Ok(ch) = char::try_from(codepoint) {
                    if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0)
                    {
                        map.entry(index.0).or_insert(ch);
                    }
                }
            });
        }

        map
    }

    /// Horizontal advance of every mapped glyph, in font units, ordered by glyph id
    fn glyph_advances(&self) -> BTreeMap<u16, u16> {
        let face = self.face.as_face_ref();
        self.glyph_chars()
            .keys()
            .filter_map(|&gid| face.glyph_hor_advance(GlyphId(gid)).map(|adv| (gid, adv)))
            .collect()
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map: String = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
"
        .to_string();

        // bfchar blocks hold at most 100 entries
        let entries: Vec<(u16, char)> = self.glyph_chars().into_iter().collect();
        for block in entries.chunks(100) {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for &(gid, ch) in block {
                let mut utf16 = [0u16; 2];
                let hex: String = ch
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|unit| format!("{unit:04x}"))
                    .collect();
                map.push_str(&format!("<{gid:04x}> <{hex}>\n"));
            }
            map.push_str("endbfchar\n");
        }

        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed =
            compress_to_vec_zlib(map.as_bytes(), CompressionLevel::DefaultCompression as u8);
        writer
            .stream(id, compressed.as_slice())
            .filter(Filter::FlateDecode);

        id
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let font_id = refs.gen(RefType::Font(font_index));
        let cid_font_id = self.write_cid(refs, font_index, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(self.name().as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }
}
