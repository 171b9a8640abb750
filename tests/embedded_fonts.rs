use prospectus::layout::LayoutConfig;
use prospectus::{
    generate, Block, Document, DocumentError, FontMetrics, FontSet, FontWeight, Pt, Section,
};

static REGULAR: &[u8] = include_bytes!("fixtures/DejaVuSans.ttf");
static BOLD: &[u8] = include_bytes!("fixtures/DejaVuSans-Bold.ttf");
/// maps only 'A'
static SINGLE_GLYPH: &[u8] = include_bytes!("fixtures/single-glyph.ttf");

fn dejavu() -> FontSet {
    FontSet::truetype(REGULAR.to_vec(), BOLD.to_vec()).expect("DejaVu Sans loads")
}

fn document() -> Document {
    Document {
        title: "Acme Holdings".to_string(),
        subtitle: "Investor overview".to_string(),
        sections: vec![Section {
            heading: "H".to_string(),
            blocks: vec![
                Block::Paragraph("Z\u{FC}rich \u{2013} \u{6F22} \u{201C}hi\u{201D}".to_string()),
                Block::BulletList(vec!["one".to_string()]),
            ],
        }],
        footer_link_text: "acme.example".to_string(),
        footer_link_url: Some("https://acme.example".to_string()),
        ..Document::default()
    }
}

#[test]
fn embedded_fonts_render_text_that_can_be_extracted_again() {
    let fonts = dejavu();
    let artifact = generate(&document(), &LayoutConfig::default(), &fonts).unwrap();

    let pdf = lopdf::Document::load_mem(&artifact.bytes).expect("output parses as a PDF");
    assert_eq!(pdf.get_pages().len(), 2);

    let body = pdf.extract_text(&[2]).unwrap();
    assert!(body.contains("Z\u{FC}rich - ? \"hi\""), "{body:?}");
    assert!(body.contains("\u{2022}"), "{body:?}");
    assert!(body.contains("one"), "{body:?}");
    assert!(body.contains("Page 2"), "{body:?}");

    let cover = pdf.extract_text(&[1]).unwrap();
    assert!(cover.contains("Acme Holdings"), "{cover:?}");
}

#[test]
fn embedded_fonts_are_written_as_cid_fonts() {
    let config = LayoutConfig {
        compress: false,
        ..LayoutConfig::default()
    };
    let artifact = generate(&document(), &config, &dejavu()).unwrap();
    let raw = String::from_utf8_lossy(&artifact.bytes);

    assert_eq!(raw.matches("/Subtype /Type0").count(), 2);
    assert_eq!(raw.matches("/Subtype /CIDFontType2").count(), 2);
    assert!(raw.contains("/Encoding /Identity-H"));
    assert!(raw.contains("/ToUnicode"));
    assert!(raw.contains("/W ["));
    assert!(raw.contains("/FontFile2"));
    assert!(raw.contains("/BaseFont /DejaVuSans-Bold"));
    assert!(!raw.contains("/BaseFont /Helvetica"));
}

#[test]
fn embedded_fonts_measure_with_their_own_metrics() {
    let fonts = dejavu();
    let helvetica = FontSet::helvetica();

    let size = Pt(12.0);
    let dejavu_width = fonts.width_of_text(FontWeight::Regular, "Revenue", size).unwrap();
    let helvetica_width = helvetica
        .width_of_text(FontWeight::Regular, "Revenue", size)
        .unwrap();
    assert!(dejavu_width > Pt(0.0));
    assert!(dejavu_width != helvetica_width);

    assert!(fonts.supports(FontWeight::Regular, '\u{0100}'));
    assert!(!fonts.supports(FontWeight::Regular, '\u{6F22}'));
    // unsupported characters measure as the placeholder drawn for them
    assert_eq!(
        fonts.width_of_text(FontWeight::Bold, "\u{6F22}", size).unwrap(),
        fonts.width_of_text(FontWeight::Bold, "?", size).unwrap()
    );
}

#[test]
fn fonts_without_a_placeholder_glyph_are_rejected() {
    let result = FontSet::truetype(SINGLE_GLYPH.to_vec(), BOLD.to_vec());
    match result {
        Err(DocumentError::FontEmbedding(msg)) => assert!(msg.contains('?'), "{msg}"),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("a font without '?' was accepted"),
    }
}
