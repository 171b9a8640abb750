use crate::{
    error::DocumentError,
    font::FontSet,
    info::Info,
    layout::LayoutConfig,
    model::Document,
    outline::Outline,
    page::Page,
    refs::{ObjectReferences, RefType},
    render::Renderer,
    units::Pt,
};
use log::debug;
use pdf_writer::{types::PageMode, Finish, Pdf, Ref};

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A section heading's position, for the document outline
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub title: String,
    /// 0-based position of the page within the document
    pub page_index: usize,
    /// Top of the heading's line box
    pub top: Pt,
}

/// Every page of a laid-out document, plus what the serializer needs to know
/// about the document as a whole
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// In reading order; the cover is first
    pub pages: Vec<Page>,
    pub title: String,
    pub subject: Option<String>,
    pub author: Option<String>,
    pub bookmarks: Vec<Bookmark>,
    /// Suggested name for the serialized file
    pub filename: String,
    /// Deflate page content streams
    pub compress: bool,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// A finished, self-contained document ready to be handed to a caller
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
}

/// Assemble a rendered document into a PDF. The entire file is built in memory.
///
/// Object ids are handed out as objects are written; pages and outline entries
/// look up the ids of the fonts and pages they point at through the same
/// [`ObjectReferences`], so nothing needs to be resolved ahead of time.
pub fn serialize(rendered: RenderedDocument, fonts: &FontSet) -> Result<Artifact, DocumentError> {
    let RenderedDocument {
        pages,
        title,
        subject,
        author,
        bookmarks,
        filename,
        compress,
    } = rendered;

    let mut refs = ObjectReferences::new();

    let catalog_id = refs.gen(RefType::Catalog);
    let page_tree_id = refs.gen(RefType::PageTree);

    let mut writer = Pdf::new();

    Info {
        title: Some(title),
        author,
        subject,
    }
    .write(&mut refs, &mut writer);

    let page_refs: Vec<Ref> = (0..pages.len())
        .map(|i| refs.gen(RefType::Page(i)))
        .collect();
    writer
        .pages(page_tree_id)
        .count(page_refs.len() as i32)
        .kids(page_refs);

    for (weight, font) in fonts.faces() {
        font.write(&mut refs, weight.index(), &mut writer);
    }

    for (page_index, page) in pages.iter().enumerate() {
        page.write(&mut refs, page_index, fonts, compress, &mut writer)?;
    }

    let outline = Outline::from_bookmarks(&bookmarks);
    let outline_id = outline.write(&mut refs, &mut writer);

    let mut catalog = writer.catalog(catalog_id);
    catalog.pages(page_tree_id);
    if let Some(outline_id) = outline_id {
        catalog.outlines(outline_id);
        catalog.page_mode(PageMode::UseOutlines);
    }
    catalog.finish();

    let bytes = writer.finish();
    debug!(
        "serialized {} pages into {} bytes as `{}`",
        pages.len(),
        bytes.len(),
        filename
    );
    Ok(Artifact {
        bytes,
        filename,
        mime_type: PDF_MIME_TYPE,
    })
}

/// Lay out and serialize a document in one call. Either the whole document is
/// produced or nothing is.
pub fn generate(
    document: &Document,
    config: &LayoutConfig,
    fonts: &FontSet,
) -> Result<Artifact, DocumentError> {
    let rendered = Renderer::new(config, fonts).render(document)?;
    serialize(rendered, fonts)
}

/// Parse a JSON document spec, then [`generate`] it
pub fn generate_from_json(
    json: &str,
    config: &LayoutConfig,
    fonts: &FontSet,
) -> Result<Artifact, DocumentError> {
    let document = Document::from_json(json)?;
    generate(&document, config, fonts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Section};

    fn sample() -> Document {
        Document {
            title: "Quarterly Update".to_string(),
            subtitle: "Q3".to_string(),
            sections: vec![
                Section {
                    heading: "Highlights".to_string(),
                    blocks: vec![Block::Paragraph("Revenue grew.".to_string())],
                },
                Section {
                    heading: "Team".to_string(),
                    blocks: vec![Block::BulletList(vec!["Ada".to_string(), "Grace".to_string()])],
                },
            ],
            footer_link_text: "example.com".to_string(),
            footer_link_url: Some("https://example.com".to_string()),
            ..Document::default()
        }
    }

    #[test]
    fn artifacts_are_pdfs() {
        let artifact =
            generate(&sample(), &LayoutConfig::default(), &FontSet::helvetica()).unwrap();
        assert_eq!(artifact.mime_type, "application/pdf");
        assert_eq!(artifact.filename, "quarterly-update.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF-"));
        let tail = String::from_utf8_lossy(&artifact.bytes[artifact.bytes.len() - 16..]);
        assert!(tail.contains("%%EOF"));
    }

    #[test]
    fn uncompressed_streams_hold_the_text() {
        let config = LayoutConfig {
            compress: false,
            ..LayoutConfig::default()
        };
        let artifact = generate(&sample(), &config, &FontSet::helvetica()).unwrap();
        let raw = String::from_utf8_lossy(&artifact.bytes);
        // "Revenue grew." as WinAnsi hex
        assert!(raw.contains("<526576656e756520677265772e> Tj"));
        assert!(raw.contains("/BaseFont /Helvetica-Bold"));
        assert!(raw.contains("/Type /Outlines"));
        assert!(raw.contains("(https://example.com)"));
    }

    #[test]
    fn invalid_specs_produce_no_bytes() {
        let result = generate_from_json(
            r#"{ "title": "T", "sections": [ { "blocks": [] } ] }"#,
            &LayoutConfig::default(),
            &FontSet::helvetica(),
        );
        assert!(matches!(result, Err(DocumentError::InputValidation(_))));
    }
}
